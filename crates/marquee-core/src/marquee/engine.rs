//! L2 Organism Layer: The marquee engine
//!
//! Owns the viewport for its whole lifetime: takes the item set out of it at
//! construction, drives the frame loop and pointer physics, and hands the
//! items and presentation back on `destroy()` or drop.

use serde::Serialize;
use tracing::{debug, trace};

use super::builder::{build_strip, BuildOutcome, InstanceId, InstanceIds, StripEntry};
use super::host::{
    Cursor, FrameHandle, InputEvent, InputKind, ListenerId, ListenerScope, Platform, Presentation,
    Viewport,
};
use super::options::{MarqueeOptions, ResolvedOptions};
use super::physics::{ScrollState, StepKind};

/// Listeners attached at construction. Move/up/cancel are window-wide so a
/// drag keeps tracking after the pointer leaves the viewport.
const LISTENERS: [(ListenerScope, InputKind); 6] = [
    (ListenerScope::Viewport, InputKind::PointerEnter),
    (ListenerScope::Viewport, InputKind::PointerLeave),
    (ListenerScope::Viewport, InputKind::PointerDown),
    (ListenerScope::Window, InputKind::PointerMove),
    (ListenerScope::Window, InputKind::PointerUp),
    (ListenerScope::Window, InputKind::PointerCancel),
];

/// Point-in-time view of the engine, for hosts and traces
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarqueeSnapshot {
    pub frame: u64,
    pub position: f64,
    pub velocity: f64,
    pub loop_length: f64,
    pub step: Option<&'static str>,
    pub dragging: bool,
    pub hovered: bool,
    pub playing: bool,
    pub instances: usize,
}

/// Seamless infinite marquee
///
/// Construct it over a viewport that already holds the items, then forward
/// the host's frame callbacks to [`Marquee::on_frame`] and pointer/size
/// events to [`Marquee::handle_input`].
pub struct Marquee<V: Viewport, P: Platform> {
    viewport: V,
    platform: P,
    options: ResolvedOptions,
    /// Items taken from the viewport, returned on teardown
    originals: Vec<V::Item>,
    /// Presentation the viewport had before construction
    saved_presentation: Option<Presentation>,
    strip: Vec<StripEntry>,
    base_len: usize,
    build_outcome: BuildOutcome,
    ids: InstanceIds,
    state: ScrollState,
    frame: Option<FrameHandle>,
    listeners: Vec<(ListenerId, InputKind)>,
    observing: bool,
    rebuild_pending: bool,
    destroyed: bool,
    frames: u64,
    last_step: Option<StepKind>,
}

impl<V: Viewport, P: Platform> Marquee<V, P> {
    /// Take over `viewport`, build the strip, attach listeners and start
    /// playing.
    pub fn new(mut viewport: V, platform: P, options: MarqueeOptions) -> Self {
        let options = ResolvedOptions::resolve(&options);
        let saved_presentation = viewport.presentation();
        let originals = viewport.take_children();

        viewport.mount_strip();
        viewport.set_strip_gap(options.gap);
        viewport.set_presentation(Some(Presentation::marquee()));

        let mut marquee = Self {
            viewport,
            platform,
            options,
            originals,
            saved_presentation,
            strip: Vec::new(),
            base_len: 0,
            build_outcome: BuildOutcome::Empty,
            ids: InstanceIds::default(),
            state: ScrollState::new(),
            frame: None,
            listeners: Vec::new(),
            observing: false,
            rebuild_pending: false,
            destroyed: false,
            frames: 0,
            last_step: None,
        };

        debug!(
            "Marquee attached: {} items, options {:?}",
            marquee.originals.len(),
            marquee.options
        );

        marquee.rebuild();
        marquee.attach_listeners();
        marquee.viewport.observe_size();
        marquee.observing = true;
        marquee.play();
        marquee
    }

    /// Start the frame loop. No-op while a frame is already scheduled.
    ///
    /// The first frame runs synchronously.
    pub fn play(&mut self) {
        if self.destroyed || self.frame.is_some() {
            return;
        }
        self.animate();
    }

    /// Cancel the scheduled frame, if any
    pub fn pause(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.platform.cancel_frame(handle);
            trace!("Marquee paused at frame {}", self.frames);
        }
    }

    /// Merge new option values. Only a gap change rebuilds the strip; the rest
    /// applies on the next frame.
    pub fn update_options(&mut self, options: MarqueeOptions) {
        if self.destroyed {
            return;
        }

        let gap_changed = self.options.merge(&options);
        self.viewport.set_strip_gap(self.options.gap);
        if gap_changed {
            debug!("Marquee gap changed to {}, rebuilding", self.options.gap);
            self.rebuild();
        }
    }

    /// Tear down for good: stop the loop, detach every listener and the size
    /// observer, drop the strip and give the original items and presentation
    /// back to the viewport. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        self.pause();
        if self.observing {
            self.viewport.disconnect_size_observer();
            self.observing = false;
        }
        for (id, _) in self.listeners.drain(..) {
            self.platform.unlisten(id);
        }
        self.state.end_drag();
        self.rebuild_pending = false;

        self.viewport.clear_strip();
        self.viewport.unmount_strip();
        self.strip.clear();
        self.base_len = 0;

        let originals = std::mem::take(&mut self.originals);
        let count = originals.len();
        self.viewport.restore_children(originals);
        self.viewport.set_presentation(self.saved_presentation.take());

        debug!("Marquee destroyed after {} frames, {} items restored", self.frames, count);
    }

    /// Frame callback from the host's clock
    pub fn on_frame(&mut self, handle: FrameHandle) {
        if self.destroyed {
            return;
        }
        if self.frame != Some(handle) {
            trace!("Ignoring stale frame {:?}", handle);
            return;
        }
        self.frame = None;
        self.animate();
    }

    /// Pointer or size event from the host
    pub fn handle_input(&mut self, event: InputEvent) {
        if self.destroyed {
            return;
        }

        let Some(kind) = event.kind() else {
            if self.observing {
                if self.frame.is_some() {
                    // Measure after layout settles: on the next frame
                    self.rebuild_pending = true;
                } else {
                    trace!("Resize while paused, rebuilding now");
                    self.rebuild();
                }
            }
            return;
        };

        if !self.listeners.iter().any(|(_, listening)| *listening == kind) {
            return;
        }

        match event {
            InputEvent::PointerEnter => self.state.set_hovered(true),
            InputEvent::PointerLeave => self.state.set_hovered(false),
            InputEvent::PointerDown { x } => {
                self.state.begin_drag(x);
                self.viewport.set_cursor(Cursor::Grabbing);
            }
            InputEvent::PointerMove { x } => {
                if self.state.drag_to(x) {
                    self.viewport.set_strip_offset(self.state.position());
                }
            }
            InputEvent::PointerUp | InputEvent::PointerCancel => {
                if self.state.end_drag() {
                    self.viewport.set_cursor(Cursor::Grab);
                }
            }
            InputEvent::Resized => {}
        }
    }

    /// One frame: pending rebuild, physics, wrap, paint, reschedule
    fn animate(&mut self) {
        if self.destroyed {
            return;
        }
        if self.rebuild_pending {
            self.rebuild();
        }

        let step = self.state.step(&self.options);
        self.viewport.set_strip_offset(self.state.position());
        self.last_step = Some(step);
        self.frames += 1;

        self.frame = Some(self.platform.request_frame());
    }

    fn rebuild(&mut self) {
        if self.destroyed {
            return;
        }
        self.rebuild_pending = false;

        let layout = build_strip(
            &mut self.viewport,
            &self.originals,
            self.options.gap,
            &mut self.ids,
        );
        self.strip = layout.entries;
        self.base_len = layout.base_len;
        self.build_outcome = layout.outcome;
        self.state.set_loop_length(layout.loop_length);
        self.viewport.set_strip_offset(self.state.position());
    }

    fn attach_listeners(&mut self) {
        for (scope, kind) in LISTENERS {
            let id = self.platform.listen(scope, kind);
            self.listeners.push((id, kind));
        }
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.state.position()
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.state.velocity()
    }

    #[inline]
    pub fn loop_length(&self) -> f64 {
        self.state.loop_length()
    }

    pub fn is_hovered(&self) -> bool {
        self.state.is_hovered()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Check if a frame is scheduled
    pub fn is_playing(&self) -> bool {
        self.frame.is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Instances currently in the strip, base content first
    pub fn strip(&self) -> &[StripEntry] {
        &self.strip
    }

    pub fn strip_ids(&self) -> Vec<InstanceId> {
        self.strip.iter().map(|entry| entry.id).collect()
    }

    /// Number of strip entries forming the base content
    pub fn base_len(&self) -> usize {
        self.base_len
    }

    pub fn build_outcome(&self) -> BuildOutcome {
        self.build_outcome
    }

    /// Number of originals held while attached
    pub fn item_count(&self) -> usize {
        self.originals.len()
    }

    pub fn last_step(&self) -> Option<StepKind> {
        self.last_step
    }

    pub fn snapshot(&self) -> MarqueeSnapshot {
        MarqueeSnapshot {
            frame: self.frames,
            position: self.state.position(),
            velocity: self.state.velocity(),
            loop_length: self.state.loop_length(),
            step: self.last_step.map(StepKind::label),
            dragging: self.state.is_dragging(),
            hovered: self.state.is_hovered(),
            playing: self.frame.is_some(),
            instances: self.strip.len(),
        }
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Mutable access for host-side layout bookkeeping (areas, widths).
    /// Report size changes with `InputEvent::Resized`.
    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

impl<V: Viewport, P: Platform> Drop for Marquee<V, P> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<V: Viewport, P: Platform> std::fmt::Debug for Marquee<V, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Marquee")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("instances", &self.strip.len())
            .field("playing", &self.frame.is_some())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
