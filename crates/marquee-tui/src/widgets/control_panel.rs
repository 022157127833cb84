use marquee_core::marquee::Direction as ScrollDirection;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, Paragraph},
    Frame,
};

use crate::app::{App, GAP_MAX, GAP_MIN, SPEED_MAX, SPEED_MIN};
use crate::input::Action;
use crate::keymap::{binding_label, Keymap};

pub struct ControlPanelWidget;

impl ControlPanelWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App, keymap: &Keymap) {
        let theme = &app.theme;
        let block = Block::default()
            .title(" Controls ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.grey))
            .style(Style::default().bg(theme.bg0));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Speed
                Constraint::Length(1), // Gap
                Constraint::Length(1), // Spacer
                Constraint::Length(1), // Direction
                Constraint::Length(1), // Hover pause
                Constraint::Length(1), // Autoscroll
                Constraint::Length(1), // Loop
                Constraint::Min(0),
            ])
            .split(inner);

        let controls = &app.controls;
        Self::render_slider(
            frame,
            rows[0],
            app,
            "Speed",
            ratio(controls.speed, SPEED_MIN, SPEED_MAX),
            format!("{:.1}", controls.speed),
            hint(keymap, Action::SpeedDown, Action::SpeedUp),
        );
        Self::render_slider(
            frame,
            rows[1],
            app,
            "Gap",
            ratio(controls.gap, GAP_MIN, GAP_MAX),
            format!("{:.0}", controls.gap),
            hint(keymap, Action::GapDown, Action::GapUp),
        );

        let direction = match controls.direction {
            ScrollDirection::Forward => "◀ left",
            ScrollDirection::Reverse => "right ▶",
        };
        let loop_state = if app.loop_suspended { "suspended" } else { "running" };
        let toggles = [
            (rows[3], "Direction", direction.to_string(), true, Action::ToggleDirection),
            (
                rows[4],
                "Hover pause",
                on_off(controls.pause_on_hover),
                controls.pause_on_hover,
                Action::ToggleHoverPause,
            ),
            (
                rows[5],
                "Autoscroll",
                on_off(controls.autoscroll),
                controls.autoscroll,
                Action::TogglePlay,
            ),
            (rows[6], "Loop", loop_state.to_string(), !app.loop_suspended, Action::ToggleLoop),
        ];

        for (row, label, value, active, action) in toggles {
            let value_style = if active {
                Style::default().fg(theme.active).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.warning)
            };
            let key = keymap
                .key_for(action)
                .map(|binding| format!("  [{}]", binding_label(&binding)))
                .unwrap_or_default();
            let line = Line::from(vec![
                Span::styled(format!(" {:<12}", label), Style::default().fg(theme.fg1)),
                Span::styled(value, value_style),
                Span::styled(key, Style::default().fg(theme.grey)),
            ]);
            frame.render_widget(Paragraph::new(line), row);
        }
    }

    fn render_slider(
        frame: &mut Frame,
        area: Rect,
        app: &App,
        label: &str,
        ratio: f64,
        value: String,
        keys: String,
    ) {
        let theme = &app.theme;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(13),
                Constraint::Min(4),
                Constraint::Length(6),
                Constraint::Length(keys.chars().count() as u16),
            ])
            .split(area);

        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {:<12}", label), Style::default().fg(theme.fg1))),
            columns[0],
        );
        let gauge = LineGauge::default()
            .ratio(ratio)
            .label("")
            .filled_style(Style::default().fg(theme.accent))
            .unfilled_style(Style::default().fg(theme.bg2));
        frame.render_widget(gauge, columns[1]);
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {:>4}", value),
                Style::default().fg(theme.fg0).add_modifier(Modifier::BOLD),
            )),
            columns[2],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(keys, Style::default().fg(theme.grey))),
            columns[3],
        );
    }
}

fn ratio(value: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

fn on_off(value: bool) -> String {
    if value { "on" } else { "off" }.to_string()
}

/// "[h/l]" style hint for a pair of slider keys
fn hint(keymap: &Keymap, down: Action, up: Action) -> String {
    match (keymap.key_for(down), keymap.key_for(up)) {
        (Some(d), Some(u)) => format!(" [{}/{}]", binding_label(&d), binding_label(&u)),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::AppConfig;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 9)).unwrap();
        terminal
            .draw(|frame| {
                ControlPanelWidget::render(frame, frame.area(), app, &Keymap::default())
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_ratio_bounds() {
        assert_eq!(ratio(SPEED_MIN, SPEED_MIN, SPEED_MAX), 0.0);
        assert_eq!(ratio(SPEED_MAX, SPEED_MIN, SPEED_MAX), 1.0);
        assert_eq!(ratio(50.0, GAP_MIN, GAP_MAX), 0.5);
        assert_eq!(ratio(1.0, 2.0, 2.0), 0.0);
    }

    #[test]
    fn test_panel_shows_values_and_keys() {
        let app = App::new(AppConfig::default());
        let text = screen(&app);

        assert!(text.contains("Controls"));
        assert!(text.contains(" 0.5"));
        assert!(text.contains("[h/l]"));
        assert!(text.contains("◀ left"));
        assert!(text.contains("Hover pause"));
        assert!(text.contains("running"));
    }

    #[test]
    fn test_panel_reflects_toggles() {
        let mut app = App::new(AppConfig::default());
        app.handle_action(Action::ToggleDirection);
        app.handle_action(Action::ToggleLoop);
        let text = screen(&app);

        assert!(text.contains("right ▶"));
        assert!(text.contains("suspended"));
    }
}
