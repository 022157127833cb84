//! In-memory host: a viewport with fixed item widths, a manually driven frame
//! clock and a pointer stream that only records listeners.
//!
//! Used by the `simulate` command and throughout the test suite.

use crate::marquee::host::{
    Cursor, FrameClock, FrameHandle, InputKind, Item, ItemBehaviors, ListenerId, ListenerScope,
    PointerStream, Presentation, Viewport,
};
use crate::marquee::{Marquee, MarqueeOptions};

/// Item with a fixed rendered width
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessItem {
    pub label: String,
    pub width: f64,
    /// Behaviors declared by the item
    pub declared: ItemBehaviors,
    /// Behaviors attached to this instance
    pub applied: ItemBehaviors,
    pub duplicate: bool,
}

impl HeadlessItem {
    pub fn new(label: impl Into<String>, width: f64) -> Self {
        Self {
            label: label.into(),
            width,
            declared: ItemBehaviors::default(),
            applied: ItemBehaviors::default(),
            duplicate: false,
        }
    }

    pub fn with_behaviors(mut self, behaviors: ItemBehaviors) -> Self {
        self.declared = behaviors;
        self.applied = behaviors;
        self
    }
}

impl Item for HeadlessItem {
    fn duplicate(&self) -> Self {
        Self {
            label: self.label.clone(),
            width: self.width,
            declared: self.declared,
            applied: ItemBehaviors::default(),
            duplicate: false,
        }
    }

    fn behaviors(&self) -> ItemBehaviors {
        self.declared
    }

    fn apply_behaviors(&mut self, behaviors: ItemBehaviors) {
        self.applied = behaviors;
    }

    fn mark_duplicate(&mut self) {
        self.duplicate = true;
    }
}

/// Viewport backed by plain vectors
#[derive(Debug, Clone, Default)]
pub struct HeadlessViewport {
    width: f64,
    children: Vec<HeadlessItem>,
    presentation: Option<Presentation>,
    /// `None` while no strip container is attached
    strip: Option<Vec<HeadlessItem>>,
    gap: f64,
    offset: f64,
    cursor: Cursor,
    observing: bool,
}

impl HeadlessViewport {
    pub fn new(width: f64, children: Vec<HeadlessItem>) -> Self {
        Self {
            width,
            children,
            ..Default::default()
        }
    }

    /// Build a viewport whose children have the given widths
    pub fn with_widths(width: f64, widths: &[f64]) -> Self {
        let children = widths
            .iter()
            .enumerate()
            .map(|(i, w)| HeadlessItem::new(format!("item-{}", i + 1), *w))
            .collect();
        Self::new(width, children)
    }

    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = Some(presentation);
        self
    }

    /// Change the width; the host is expected to report `InputEvent::Resized`
    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    pub fn children(&self) -> &[HeadlessItem] {
        &self.children
    }

    pub fn strip(&self) -> &[HeadlessItem] {
        self.strip.as_deref().unwrap_or(&[])
    }

    pub fn is_strip_mounted(&self) -> bool {
        self.strip.is_some()
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn current_presentation(&self) -> Option<Presentation> {
        self.presentation
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }
}

impl Viewport for HeadlessViewport {
    type Item = HeadlessItem;

    fn width(&self) -> f64 {
        self.width
    }

    fn take_children(&mut self) -> Vec<HeadlessItem> {
        std::mem::take(&mut self.children)
    }

    fn restore_children(&mut self, children: Vec<HeadlessItem>) {
        self.children.extend(children);
    }

    fn presentation(&self) -> Option<Presentation> {
        self.presentation
    }

    fn set_presentation(&mut self, presentation: Option<Presentation>) {
        self.presentation = presentation;
        self.cursor = presentation.map(|p| p.cursor).unwrap_or_default();
    }

    fn mount_strip(&mut self) {
        self.strip.get_or_insert_with(Vec::new);
    }

    fn unmount_strip(&mut self) {
        self.strip = None;
        self.offset = 0.0;
    }

    fn clear_strip(&mut self) {
        if let Some(strip) = self.strip.as_mut() {
            strip.clear();
        }
    }

    fn push_to_strip(&mut self, item: HeadlessItem) {
        if let Some(strip) = self.strip.as_mut() {
            strip.push(item);
        }
    }

    fn measure_strip_item(&self, index: usize) -> f64 {
        self.strip().get(index).map(|item| item.width).unwrap_or(0.0)
    }

    fn set_strip_gap(&mut self, gap: f64) {
        self.gap = gap;
    }

    fn set_strip_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn observe_size(&mut self) {
        self.observing = true;
    }

    fn disconnect_size_observer(&mut self) {
        self.observing = false;
    }
}

/// Frame clock and pointer stream driven by the caller
#[derive(Debug, Default)]
pub struct ManualPlatform {
    next_frame: u64,
    pending: Vec<FrameHandle>,
    next_listener: u64,
    listeners: Vec<(ListenerId, ListenerScope, InputKind)>,
}

impl ManualPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks currently scheduled
    pub fn pending_frames(&self) -> &[FrameHandle] {
        &self.pending
    }

    /// Remove the oldest scheduled callback so it can be delivered
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_listening(&self, scope: ListenerScope, kind: InputKind) -> bool {
        self.listeners
            .iter()
            .any(|(_, s, k)| *s == scope && *k == kind)
    }
}

impl FrameClock for ManualPlatform {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_frame += 1;
        let handle = FrameHandle(self.next_frame);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|pending| *pending != handle);
    }
}

impl PointerStream for ManualPlatform {
    fn listen(&mut self, scope: ListenerScope, kind: InputKind) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push((id, scope, kind));
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.listeners.retain(|(listener, _, _)| *listener != id);
    }
}

/// Marquee running on the in-memory host
pub type HeadlessMarquee = Marquee<HeadlessViewport, ManualPlatform>;

impl Marquee<HeadlessViewport, ManualPlatform> {
    /// Convenience constructor for a viewport of fixed-width items
    pub fn headless(viewport_width: f64, item_widths: &[f64], options: MarqueeOptions) -> Self {
        Marquee::new(
            HeadlessViewport::with_widths(viewport_width, item_widths),
            ManualPlatform::new(),
            options,
        )
    }

    /// Deliver the oldest scheduled frame. Returns `false` when none is pending.
    pub fn advance_frame(&mut self) -> bool {
        match self.platform_mut().take_frame() {
            Some(handle) => {
                self.on_frame(handle);
                true
            }
            None => false,
        }
    }

    /// Deliver `frames` frames, stopping early if the loop stops
    pub fn advance_frames(&mut self, frames: usize) -> usize {
        (0..frames).take_while(|_| self.advance_frame()).count()
    }
}
