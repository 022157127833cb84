use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::input::Action;
use crate::keymap::{binding_label, Keymap};
use crate::theme::Theme;

/// Actions listed in the help popup
const HELP_ENTRIES: [(Action, &str); 11] = [
    (Action::TogglePlay, "Autoscroll on/off"),
    (Action::ToggleLoop, "Suspend/resume frame loop"),
    (Action::SpeedUp, "Speed up"),
    (Action::SpeedDown, "Speed down"),
    (Action::GapUp, "Wider gap"),
    (Action::GapDown, "Narrower gap"),
    (Action::ToggleDirection, "Flip direction"),
    (Action::ToggleHoverPause, "Pause on hover on/off"),
    (Action::Reset, "Destroy and re-attach"),
    (Action::ToggleHelp, "This help"),
    (Action::Quit, "Quit"),
];

pub struct PopupWidget;

impl PopupWidget {
    /// Render the key reference centered over the screen
    pub fn render_help(frame: &mut Frame, keymap: &Keymap, theme: &Theme) {
        let area = frame.area();

        let mut lines: Vec<Line> = HELP_ENTRIES
            .iter()
            .map(|(action, description)| {
                let key = keymap
                    .key_for(*action)
                    .map(|binding| binding_label(&binding))
                    .unwrap_or_else(|| "-".to_string());
                Line::from(vec![
                    Span::styled(
                        format!(" {:>7}  ", key),
                        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(*description, Style::default().fg(theme.fg0)),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Drag the strip with the mouse to fling it",
            Style::default().fg(theme.grey),
        )));

        let popup_width = 48u16.min(area.width.saturating_sub(4));
        let popup_height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        // Clear the background area
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));

        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }
}

/// Helper function to create a centered rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
