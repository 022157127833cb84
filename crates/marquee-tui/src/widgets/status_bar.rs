use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let (mode_str, mode_color) = match app.marquee.as_ref() {
            None => ("DETACHED", theme.grey),
            Some(m) if m.is_dragging() => ("DRAG", theme.accent),
            Some(m) if m.is_playing() => ("RUNNING", theme.active),
            Some(_) => ("PAUSED", theme.warning),
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else if let Some(m) = app.marquee.as_ref() {
            let step = m.last_step().map(|s| s.label()).unwrap_or("-");
            format!(
                " pos {:.1}/{:.0} | vel {:.2} | {} | {} items",
                m.position(),
                m.loop_length(),
                m.velocity(),
                step,
                m.item_count()
            )
        } else {
            String::new()
        };

        let mode_text = format!(" {} ", mode_str);
        let help_hint = " q:quit space:play p:loop ?:help ";
        let used = mode_text.width() + status_text.width() + help_hint.width();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(
                mode_text,
                Style::default()
                    .fg(theme.bg0)
                    .bg(mode_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
