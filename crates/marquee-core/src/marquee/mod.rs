//! Seamless marquee engine
//!
//! A strip of duplicated items scrolls inside a fixed viewport. The position
//! wraps modulo the width of one base repetition, so the strip reads as
//! infinite with no visible seam.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `options` - Partial and resolved options
//! - `host` - Capabilities a host provides (viewport, frame clock, pointer stream)
//! - `physics` - Scroll state, drag inertia and the wrap rule
//!
//! ## L3 Molecular Layer
//! - `builder` - Measures items and duplicates them into the strip
//!
//! ## L2 Organism Layer
//! - `engine` - Frame loop, input glue and lifecycle
//!
//! # Usage
//!
//! ```ignore
//! use marquee_core::marquee::{Marquee, MarqueeOptions};
//!
//! let mut marquee = Marquee::new(viewport, platform, MarqueeOptions::new().speed(1.5));
//!
//! // From the host's frame callback
//! marquee.on_frame(handle);
//!
//! // From the host's input dispatch
//! marquee.handle_input(InputEvent::PointerDown { x: 120.0 });
//!
//! marquee.destroy();
//! ```

// L4 Atomic Layer
pub mod host;
pub mod options;
pub mod physics;

// L3 Molecular Layer
pub mod builder;

// L2 Organism Layer
pub mod engine;

// Re-exports for convenient access
pub use builder::{BuildOutcome, InstanceId, StripEntry, MAX_REPETITIONS, SEAM_BUFFER};
pub use engine::{Marquee, MarqueeSnapshot};
pub use host::{
    Cursor, FrameClock, FrameHandle, InputEvent, InputKind, Item, ItemBehaviors, ListenerId,
    ListenerScope, Platform, PointerStream, Presentation, Viewport,
};
pub use options::{Direction, MarqueeOptions, ResolvedOptions};
pub use physics::{StepKind, FRICTION, VELOCITY_EPSILON};
