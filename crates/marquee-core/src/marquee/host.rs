//! L4 Atomic Layer: Host capabilities
//!
//! The engine never touches a rendering surface directly. A host hands it a
//! [`Viewport`] (children, measurement, strip transform) and a [`Platform`]
//! (frame clock plus pointer stream), and forwards the callbacks it receives
//! through `Marquee::on_frame` and `Marquee::handle_input`.

/// Behaviors an item declares so the builder can re-apply them to clones.
///
/// Cloning an item is structural only, so anything attached to the original
/// has to be described here and applied again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemBehaviors {
    /// Suppress the platform's native "drag this element" gesture
    pub suppress_native_drag: bool,
}

impl ItemBehaviors {
    /// Behaviors the engine always wants on strip instances
    pub fn strip_defaults() -> Self {
        Self {
            suppress_native_drag: true,
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            suppress_native_drag: self.suppress_native_drag || other.suppress_native_drag,
        }
    }
}

/// An opaque renderable item owned by the host
pub trait Item {
    /// Structural copy with the same rendered content and no behaviors
    fn duplicate(&self) -> Self
    where
        Self: Sized;

    /// Behaviors declared by this item
    fn behaviors(&self) -> ItemBehaviors {
        ItemBehaviors::default()
    }

    /// Attach behaviors to this instance
    fn apply_behaviors(&mut self, behaviors: ItemBehaviors);

    /// Flag an instance as a visual duplicate (hidden from assistive tech)
    fn mark_duplicate(&mut self) {}
}

/// Pointer cursor shown over the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Grab,
    Grabbing,
}

/// Viewport presentation attributes the engine overrides while attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    /// Hide content outside the viewport bounds
    pub clip_overflow: bool,
    /// Let vertical touch panning through while horizontal drags scroll
    pub touch_pan_y: bool,
    pub cursor: Cursor,
}

impl Presentation {
    /// Attributes applied while a marquee owns the viewport
    pub fn marquee() -> Self {
        Self {
            clip_overflow: true,
            touch_pan_y: true,
            cursor: Cursor::Grab,
        }
    }
}

/// The host surface a marquee is attached to
pub trait Viewport {
    type Item: Item;

    /// Current inner width in layout units
    fn width(&self) -> f64;

    /// Detach and return the current children in order
    fn take_children(&mut self) -> Vec<Self::Item>;

    /// Re-attach children in the given order
    fn restore_children(&mut self, children: Vec<Self::Item>);

    /// Presentation attributes set before the marquee attached, if any
    fn presentation(&self) -> Option<Presentation>;

    /// Set presentation attributes, or clear them with `None`
    fn set_presentation(&mut self, presentation: Option<Presentation>);

    /// Attach the (empty) strip container
    fn mount_strip(&mut self);

    /// Remove the strip container and everything in it
    fn unmount_strip(&mut self);

    /// Discard every instance in the strip
    fn clear_strip(&mut self);

    /// Append an instance to the strip
    fn push_to_strip(&mut self, item: Self::Item);

    /// Rendered width of the strip instance at `index`, measured in place
    fn measure_strip_item(&self, index: usize) -> f64;

    /// Spacing the strip lays out between consecutive instances
    fn set_strip_gap(&mut self, gap: f64);

    /// Translate the strip left by `offset`
    fn set_strip_offset(&mut self, offset: f64);

    fn set_cursor(&mut self, cursor: Cursor);

    /// Start delivering size changes as `InputEvent::Resized`
    fn observe_size(&mut self);

    fn disconnect_size_observer(&mut self);
}

/// Handle for a scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Per-refresh scheduler
pub trait FrameClock {
    /// Schedule one call to `Marquee::on_frame` for the next refresh
    fn request_frame(&mut self) -> FrameHandle;

    /// Drop a scheduled callback. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerScope {
    /// Events targeting the viewport itself
    Viewport,
    /// Events anywhere the host can capture input
    Window,
}

/// Input kinds a marquee listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    PointerEnter,
    PointerLeave,
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
}

/// Handle for an attached listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Global pointer stream
pub trait PointerStream {
    fn listen(&mut self, scope: ListenerScope, kind: InputKind) -> ListenerId;

    /// Detach a listener. Unknown ids are ignored.
    fn unlisten(&mut self, id: ListenerId);
}

/// Scheduling and input capabilities of the host
pub trait Platform: FrameClock + PointerStream {}

impl<T: FrameClock + PointerStream> Platform for T {}

/// Events a host forwards to the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerEnter,
    PointerLeave,
    /// Primary button pressed over the viewport at horizontal coordinate `x`
    PointerDown { x: f64 },
    PointerMove { x: f64 },
    PointerUp,
    PointerCancel,
    /// The viewport size changed
    Resized,
}

impl InputEvent {
    /// Listener kind that receives this event, `None` for size changes
    pub fn kind(&self) -> Option<InputKind> {
        match self {
            InputEvent::PointerEnter => Some(InputKind::PointerEnter),
            InputEvent::PointerLeave => Some(InputKind::PointerLeave),
            InputEvent::PointerDown { .. } => Some(InputKind::PointerDown),
            InputEvent::PointerMove { .. } => Some(InputKind::PointerMove),
            InputEvent::PointerUp => Some(InputKind::PointerUp),
            InputEvent::PointerCancel => Some(InputKind::PointerCancel),
            InputEvent::Resized => None,
        }
    }
}
