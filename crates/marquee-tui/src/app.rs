use crossterm::event::MouseEvent;
use marquee_core::config::MarqueeConfig;
use marquee_core::marquee::{
    Direction as ScrollDirection, InputEvent, ListenerScope, Marquee, MarqueeOptions, Viewport,
};
use marquee_core::AppConfig;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tracing::{debug, info};

use crate::host::{TerminalMarquee, TerminalPlatform, TerminalViewport};
use crate::input::{Action, PointerRouter};
use crate::theme::Theme;
use crate::themes::load_theme;

/// Speed slider bounds
pub const SPEED_MIN: f64 = 0.1;
pub const SPEED_MAX: f64 = 5.0;
/// Gap slider bounds
pub const GAP_MIN: f64 = 0.0;
pub const GAP_MAX: f64 = 100.0;

/// Height of the strip band in rows
pub const STRIP_HEIGHT: u16 = 3;

/// Values behind the control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    pub speed: f64,
    pub gap: f64,
    pub direction: ScrollDirection,
    pub pause_on_hover: bool,
    /// When off the marquee runs at speed 0; dragging still works
    pub autoscroll: bool,
}

impl Controls {
    pub fn from_config(config: &MarqueeConfig) -> Self {
        Self {
            speed: clamp_or(config.speed, SPEED_MIN, SPEED_MAX),
            gap: clamp_or(config.gap, GAP_MIN, GAP_MAX),
            direction: config.direction,
            pause_on_hover: config.pause_on_hover,
            autoscroll: true,
        }
    }

    /// Options the marquee should run with
    pub fn to_options(&self) -> MarqueeOptions {
        let speed = if self.autoscroll { self.speed } else { 0.0 };
        MarqueeOptions::new()
            .direction(self.direction)
            .gap(self.gap)
            .pause_on_hover(self.pause_on_hover)
            .speed(speed)
    }
}

fn clamp_or(value: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        min
    }
}

/// Move a slider value by `delta`, snapped to avoid float drift
fn nudge(value: f64, delta: f64, min: f64, max: f64) -> f64 {
    (((value + delta) * 1000.0).round() / 1000.0).clamp(min, max)
}

/// Screen regions, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainLayout {
    pub header: Rect,
    pub strip: Rect,
    pub panel: Rect,
    pub status: Rect,
}

/// Split the terminal into header, strip band, control panel and status bar
pub fn main_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Header
            Constraint::Length(1),            // Spacer
            Constraint::Length(STRIP_HEIGHT), // Strip
            Constraint::Length(1),            // Spacer
            Constraint::Min(0),               // Control panel
            Constraint::Length(1),            // Status bar
        ])
        .split(area);

    MainLayout {
        header: chunks[0],
        strip: chunks[2],
        panel: chunks[4],
        status: chunks[5],
    }
}

/// Application state
pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    pub controls: Controls,
    /// Attached once the strip area is known
    pub marquee: Option<TerminalMarquee>,
    pub router: PointerRouter,
    /// Frame loop suspended with `pause()`
    pub loop_suspended: bool,
    pub show_help: bool,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let theme = load_theme(&config.ui.theme);
        let controls = Controls::from_config(&config.marquee);
        Self {
            config,
            theme,
            controls,
            marquee: None,
            router: PointerRouter::default(),
            loop_suspended: false,
            show_help: false,
            should_quit: false,
            status_message: None,
        }
    }

    /// Place the strip. Attaches the marquee on first call; later calls
    /// report width changes as a resize.
    pub fn set_strip_area(&mut self, area: Rect) {
        self.router.set_area(area);
        match self.marquee.as_mut() {
            Some(marquee) => {
                if marquee.viewport_mut().set_area(area) {
                    marquee.handle_input(InputEvent::Resized);
                }
            }
            None => {
                let viewport = TerminalViewport::from_labels(
                    area,
                    &self.config.ui.items,
                    self.theme.chips.len(),
                );
                self.attach(viewport);
            }
        }
    }

    fn attach(&mut self, viewport: TerminalViewport) {
        let mut marquee =
            Marquee::new(viewport, TerminalPlatform::new(), self.controls.to_options());
        if self.loop_suspended {
            marquee.pause();
        }
        self.marquee = Some(marquee);
    }

    /// Deliver the frame scheduled for this tick
    pub fn tick(&mut self) {
        if let Some(marquee) = self.marquee.as_mut() {
            if let Some(handle) = marquee.platform_mut().take_due() {
                marquee.on_frame(handle);
            }
        }
    }

    pub fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let events = self.router.route(mouse);
        self.dispatch(events);
    }

    /// Terminal focus lost: an active drag is cancelled
    pub fn focus_lost(&mut self) {
        let events: Vec<_> = self.router.cancel().into_iter().collect();
        self.dispatch(events);
    }

    /// Forward pointer events the marquee is listening for
    fn dispatch(&mut self, events: Vec<(ListenerScope, InputEvent)>) {
        let Some(marquee) = self.marquee.as_mut() else {
            return;
        };
        for (scope, event) in events {
            let listening = event
                .kind()
                .is_some_and(|kind| marquee.platform().is_listening(scope, kind));
            if listening {
                marquee.handle_input(event);
            }
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::TogglePlay => {
                self.controls.autoscroll = !self.controls.autoscroll;
                self.apply_controls();
                let state = if self.controls.autoscroll { "on" } else { "off" };
                self.set_status(format!("Autoscroll {}", state));
            }
            Action::ToggleLoop => self.toggle_loop(),
            Action::SpeedUp | Action::SpeedDown => {
                let step = self.config.ui.speed_step.abs();
                let delta = if action == Action::SpeedUp { step } else { -step };
                self.controls.speed = nudge(self.controls.speed, delta, SPEED_MIN, SPEED_MAX);
                self.apply_controls();
            }
            Action::GapUp | Action::GapDown => {
                let step = self.config.ui.gap_step.abs();
                let delta = if action == Action::GapUp { step } else { -step };
                self.controls.gap = nudge(self.controls.gap, delta, GAP_MIN, GAP_MAX);
                self.apply_controls();
            }
            Action::ToggleDirection => {
                self.controls.direction = self.controls.direction.toggled();
                self.apply_controls();
            }
            Action::ToggleHoverPause => {
                self.controls.pause_on_hover = !self.controls.pause_on_hover;
                self.apply_controls();
            }
            Action::Reset => self.reset(),
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::ExitMode => {
                self.show_help = false;
                self.clear_status();
            }
            Action::None => {}
        }
    }

    fn apply_controls(&mut self) {
        debug!("Controls changed: {:?}", self.controls);
        if let Some(marquee) = self.marquee.as_mut() {
            marquee.update_options(self.controls.to_options());
        }
    }

    fn toggle_loop(&mut self) {
        self.loop_suspended = !self.loop_suspended;
        if let Some(marquee) = self.marquee.as_mut() {
            if self.loop_suspended {
                marquee.pause();
            } else {
                marquee.play();
            }
        }
        let state = if self.loop_suspended { "suspended" } else { "resumed" };
        self.set_status(format!("Loop {}", state));
    }

    /// Tear the marquee down and attach a fresh one over the restored chips
    pub fn reset(&mut self) {
        let Some(mut marquee) = self.marquee.take() else {
            return;
        };
        marquee.destroy();
        let area = marquee.viewport().area();
        let chips = marquee.viewport_mut().take_children();
        drop(marquee);

        info!("Marquee reset with {} items", chips.len());
        self.router = PointerRouter::new(area);
        self.attach(TerminalViewport::new(area, chips));
        self.set_status("Marquee reset");
    }

    pub fn is_running(&self) -> bool {
        self.marquee.as_ref().is_some_and(|m| m.is_playing())
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
