use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use marquee_core::marquee::{InputEvent, ListenerScope};
use ratatui::layout::Rect;

use crate::app::App;
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    TogglePlay,       // Autoscroll on/off (speed 0 while off)
    ToggleLoop,       // Suspend/resume the frame loop
    SpeedUp,
    SpeedDown,
    GapUp,
    GapDown,
    ToggleDirection,
    ToggleHoverPause,
    Reset,            // Destroy and re-attach the marquee
    ToggleHelp,
    ExitMode,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    if app.show_help {
        // Any key closes help
        return Action::ExitMode;
    }

    let binding = KeyBinding::new(key.code, key.modifiers);
    if let Some(action) = keymap.get(&binding) {
        return *action;
    }

    // Terminals differ on whether Shift is reported with shifted chars
    if let KeyCode::Char(c) = key.code {
        let fallback = if c.is_ascii_uppercase() {
            KeyBinding::shift(key.code)
        } else {
            KeyBinding::new(key.code, key.modifiers.difference(KeyModifiers::SHIFT))
        };
        if let Some(action) = keymap.get(&fallback) {
            return *action;
        }
    }

    Action::None
}

/// Turns terminal mouse reports into pointer events for the strip
///
/// Terminals only report motion, so enter and leave are derived from which
/// side of the strip area consecutive reports land on. Presses start inside
/// the strip; moves and releases are window wide so a drag keeps tracking
/// after the pointer leaves the strip.
#[derive(Debug, Clone, Default)]
pub struct PointerRouter {
    area: Rect,
    inside: bool,
    pressed: bool,
}

impl PointerRouter {
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            ..Default::default()
        }
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Pointer events for one mouse report, in delivery order
    pub fn route(&mut self, mouse: &MouseEvent) -> Vec<(ListenerScope, InputEvent)> {
        let mut events = Vec::new();
        let x = f64::from(mouse.column);

        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
                self.track_hover(mouse, &mut events);
                if matches!(mouse.kind, MouseEventKind::Drag(_)) && self.pressed {
                    events.push((ListenerScope::Window, InputEvent::PointerMove { x }));
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.track_hover(mouse, &mut events);
                if self.inside {
                    self.pressed = true;
                    events.push((ListenerScope::Viewport, InputEvent::PointerDown { x }));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.track_hover(mouse, &mut events);
                if self.pressed {
                    self.pressed = false;
                    events.push((ListenerScope::Window, InputEvent::PointerUp));
                }
            }
            _ => {}
        }

        events
    }

    /// The terminal stopped reporting the pointer
    pub fn cancel(&mut self) -> Option<(ListenerScope, InputEvent)> {
        if self.pressed {
            self.pressed = false;
            Some((ListenerScope::Window, InputEvent::PointerCancel))
        } else {
            None
        }
    }

    fn track_hover(&mut self, mouse: &MouseEvent, events: &mut Vec<(ListenerScope, InputEvent)>) {
        let inside = contains(self.area, mouse.column, mouse.row);
        if inside != self.inside {
            self.inside = inside;
            let event = if inside {
                InputEvent::PointerEnter
            } else {
                InputEvent::PointerLeave
            };
            events.push((ListenerScope::Viewport, event));
        }
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.left() && column < area.right() && row >= area.top() && row < area.bottom()
}
