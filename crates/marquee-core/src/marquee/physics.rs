//! L4 Atomic Layer: Scroll position, drag physics and the wrap rule
//!
//! Pure state with no host access. One call to [`ScrollState::step`] is one
//! frame of motion.

use super::options::ResolvedOptions;

/// Per-frame velocity decay after a drag is released
pub const FRICTION: f64 = 0.95;

/// Below this speed inertia stops and autoscroll takes over
pub const VELOCITY_EPSILON: f64 = 0.1;

/// What moved the position during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Pointer is down; position follows the pointer directly
    Dragging,
    /// Released drag still coasting
    Inertia,
    /// Regular autoscroll advance
    Autoscroll,
    /// Autoscroll held by pause-on-hover
    HoverPaused,
}

impl StepKind {
    pub fn label(self) -> &'static str {
        match self {
            StepKind::Dragging => "drag",
            StepKind::Inertia => "inertia",
            StepKind::Autoscroll => "auto",
            StepKind::HoverPaused => "hover",
        }
    }
}

/// Wrap `position` into `[0, loop_length)`.
///
/// A zero (or negative) loop length means nothing is measurable yet and the
/// position is returned untouched.
#[inline]
pub fn wrap_position(position: f64, loop_length: f64) -> f64 {
    if loop_length <= 0.0 {
        return position;
    }

    let mut wrapped = position;
    if wrapped >= loop_length {
        wrapped -= loop_length;
    } else if wrapped < 0.0 {
        wrapped += loop_length;
    }

    // A single adjustment covers every per-frame delta; a shrunken loop or a
    // drag longer than one loop needs the full modulo.
    if !(0.0..loop_length).contains(&wrapped) {
        wrapped = wrapped.rem_euclid(loop_length);
        if wrapped >= loop_length {
            wrapped = 0.0;
        }
    }

    wrapped
}

/// Scroll state owned by the engine
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    /// Offset into the strip
    position: f64,
    /// Width of one base repetition, zero when not measurable
    loop_length: f64,
    /// Last drag delta, decayed by friction once released
    velocity: f64,
    hovered: bool,
    dragging: bool,
    last_pointer_x: f64,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    pub fn loop_length(&self) -> f64 {
        self.loop_length
    }

    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Install a freshly measured loop length and pull the position back in
    /// range.
    pub fn set_loop_length(&mut self, loop_length: f64) {
        self.loop_length = loop_length.max(0.0);
        self.wrap();
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    /// Pointer went down over the viewport
    pub fn begin_drag(&mut self, x: f64) {
        self.dragging = true;
        self.last_pointer_x = x;
        self.velocity = 0.0;
    }

    /// Follow the pointer. Returns `false` when no drag is active.
    ///
    /// Moving the pointer left pulls content left, so the position grows by
    /// the negated delta. The wrap rule applies right after the write.
    pub fn drag_to(&mut self, x: f64) -> bool {
        if !self.dragging {
            return false;
        }

        let delta = x - self.last_pointer_x;
        self.last_pointer_x = x;
        self.velocity = delta;
        self.position -= delta;
        self.wrap();
        true
    }

    /// Pointer released or cancelled. Returns `false` when no drag was active.
    pub fn end_drag(&mut self) -> bool {
        if !self.dragging {
            return false;
        }
        self.dragging = false;
        true
    }

    /// Advance one frame and apply the wrap rule
    pub fn step(&mut self, options: &ResolvedOptions) -> StepKind {
        let kind = if self.dragging {
            StepKind::Dragging
        } else if self.velocity.abs() > VELOCITY_EPSILON {
            self.position -= self.velocity;
            self.velocity *= FRICTION;
            StepKind::Inertia
        } else {
            self.velocity = 0.0;
            if options.pause_on_hover && self.hovered {
                StepKind::HoverPaused
            } else {
                self.position += options.autoscroll_delta();
                StepKind::Autoscroll
            }
        };

        self.wrap();
        kind
    }

    /// Keep the position inside `[0, loop_length)`
    #[inline]
    pub fn wrap(&mut self) {
        self.position = wrap_position(self.position, self.loop_length);
    }
}
