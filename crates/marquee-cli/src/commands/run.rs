use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use marquee_core::AppConfig;
use marquee_tui::{
    app::{main_layout, App},
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    keymap::Keymap,
    widgets::{ControlPanelWidget, PopupWidget, StatusBarWidget, StripWidget},
};

/// Frame rate used when the configured one is zero
const FALLBACK_FRAME_RATE: u32 = 60;

pub async fn run(config: AppConfig) -> Result<()> {
    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);
    let frame_period = frame_period(config.ui.frame_rate);
    info!(
        "Starting marquee demo: theme {}, {} items, frame period {:?}",
        config.ui.theme,
        config.ui.items.len(),
        frame_period
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange,
        SetTitle("Marquee")
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let events = EventHandler::spawn();
    let result = event_loop(&mut terminal, &mut app, &keymap, events, frame_period).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    if let Some(marquee) = app.marquee.as_mut() {
        marquee.destroy();
    }
    info!("Marquee demo exited");

    result
}

fn frame_period(frame_rate: u32) -> Duration {
    let fps = if frame_rate == 0 {
        FALLBACK_FRAME_RATE
    } else {
        frame_rate
    };
    Duration::from_secs_f64(1.0 / f64::from(fps))
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    keymap: &Keymap,
    mut events: EventHandler,
    frame_period: Duration,
) -> Result<()> {
    let mut ticker = interval(frame_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        terminal.draw(|frame| draw(frame, app, keymap))?;

        tokio::select! {
            _ = ticker.tick() => app.tick(),
            event = events.next() => match event {
                Some(event) => handle_event(app, event, keymap),
                None => break,
            },
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_event(app: &mut App, event: AppEvent, keymap: &Keymap) {
    match event {
        AppEvent::Key(key) => {
            let action = handle_key_event(key, app, keymap);
            app.handle_action(action);
        }
        AppEvent::Mouse(mouse) => app.handle_mouse(&mouse),
        // Layout is recomputed on the next draw, which reports the new width
        AppEvent::Resize(_, _) => {}
        AppEvent::FocusLost => app.focus_lost(),
    }
}

fn draw(frame: &mut Frame, app: &mut App, keymap: &Keymap) {
    let layout = main_layout(frame.area());
    app.set_strip_area(layout.strip);

    let theme = &app.theme;
    let header = Line::from(vec![
        Span::styled(
            " marquee ",
            Style::default()
                .fg(theme.bg0)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} items  ·  theme {}", app.config.ui.items.len(), app.config.ui.theme),
            Style::default().fg(theme.grey),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(header).style(Style::default().bg(theme.bg0)),
        layout.header,
    );

    if let Some(marquee) = app.marquee.as_ref() {
        frame.render_widget(StripWidget::new(marquee.viewport(), &app.theme), layout.strip);
    }
    ControlPanelWidget::render(frame, layout.panel, app, keymap);
    StatusBarWidget::render(frame, layout.status, app);

    if app.show_help {
        PopupWidget::render_help(frame, keymap, &app.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
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
    fn test_frame_period_fallback() {
        assert!((frame_period(0).as_secs_f64() - 1.0 / 60.0).abs() < 1e-6);
        assert!((frame_period(50).as_secs_f64() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_draw_attaches_and_renders_strip() {
        let mut config = AppConfig::default();
        config.ui.items = vec!["Aurora".into(), "Basalt".into()];
        let mut app = App::new(config);
        let keymap = Keymap::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();

        terminal.draw(|frame| draw(frame, &mut app, &keymap)).unwrap();

        assert!(app.is_running());
        let expected = main_layout(ratatui::layout::Rect::new(0, 0, 60, 20)).strip;
        assert_eq!(app.router.area(), expected);
        let text = screen(&terminal);
        assert!(text.contains("marquee"));
        assert!(text.contains("Controls"));
        assert!(text.contains("RUNNING"));
    }

    #[test]
    fn test_help_key_opens_popup() {
        let mut app = App::new(AppConfig::default());
        let keymap = Keymap::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();

        handle_event(
            &mut app,
            AppEvent::Key(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE)),
            &keymap,
        );
        terminal.draw(|frame| draw(frame, &mut app, &keymap)).unwrap();
        assert!(screen(&terminal).contains("Flip direction"));

        handle_event(
            &mut app,
            AppEvent::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)),
            &keymap,
        );
        assert!(!app.show_help);
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_loop_runs_until_quit() {
        let mut app = App::new(AppConfig::default());
        let keymap = Keymap::default();
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)))
            .unwrap();

        event_loop(
            &mut terminal,
            &mut app,
            &keymap,
            EventHandler::from_receiver(rx),
            frame_period(30),
        )
        .await
        .unwrap();

        assert!(app.should_quit);
        assert!(app.marquee.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_loop_stops_when_reader_is_gone() {
        let mut app = App::new(AppConfig::default());
        let keymap = Keymap::default();
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<AppEvent>();
        drop(tx);

        event_loop(
            &mut terminal,
            &mut app,
            &keymap,
            EventHandler::from_receiver(rx),
            frame_period(30),
        )
        .await
        .unwrap();
        assert!(!app.should_quit);
    }
}
