//! Terminal implementation of the marquee host capabilities.
//!
//! Layout units are terminal cells. The viewport is a rectangle of the
//! screen; the frame clock hands out one frame per tick of the render loop.

use std::collections::HashMap;

use marquee_core::marquee::{
    Cursor, FrameClock, FrameHandle, InputKind, Item, ItemBehaviors, ListenerId, ListenerScope,
    Marquee, PointerStream, Presentation, Viewport,
};
use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

/// Marquee running in the terminal
pub type TerminalMarquee = Marquee<TerminalViewport, TerminalPlatform>;

/// A labelled chip in the strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub label: String,
    /// Index into the theme's chip palette
    pub tone: usize,
    /// Behaviors attached to this instance
    pub behaviors: ItemBehaviors,
    /// Visual duplicate, not the first repetition
    pub duplicate: bool,
}

impl Chip {
    /// Horizontal padding on each side of the label
    pub const PADDING: usize = 1;

    pub fn new(label: impl Into<String>, tone: usize) -> Self {
        Self {
            label: label.into(),
            tone,
            behaviors: ItemBehaviors::default(),
            duplicate: false,
        }
    }

    /// Width in terminal cells, padding included
    pub fn cells(&self) -> usize {
        self.label.width() + Self::PADDING * 2
    }
}

impl Item for Chip {
    fn duplicate(&self) -> Self {
        Self::new(self.label.clone(), self.tone)
    }

    fn behaviors(&self) -> ItemBehaviors {
        // Terminals have no native drag gesture to suppress
        ItemBehaviors::default()
    }

    fn apply_behaviors(&mut self, behaviors: ItemBehaviors) {
        self.behaviors = behaviors;
    }

    fn mark_duplicate(&mut self) {
        self.duplicate = true;
    }
}

/// Screen rectangle hosting the strip
#[derive(Debug, Clone, Default)]
pub struct TerminalViewport {
    area: Rect,
    children: Vec<Chip>,
    strip: Option<Vec<Chip>>,
    gap: f64,
    offset: f64,
    cursor: Cursor,
    presentation: Option<Presentation>,
    observing: bool,
}

impl TerminalViewport {
    pub fn new(area: Rect, children: Vec<Chip>) -> Self {
        Self {
            area,
            children,
            ..Default::default()
        }
    }

    /// Chips for a list of labels, cycling through `tones` palette entries
    pub fn from_labels<S: AsRef<str>>(area: Rect, labels: &[S], tones: usize) -> Self {
        let children = labels
            .iter()
            .enumerate()
            .map(|(i, label)| Chip::new(label.as_ref(), i % tones.max(1)))
            .collect();
        Self::new(area, children)
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Move the viewport. Returns `true` when the width changed and an
    /// observed size change should be reported.
    pub fn set_area(&mut self, area: Rect) -> bool {
        let resized = area.width != self.area.width;
        self.area = area;
        resized && self.observing
    }

    pub fn children(&self) -> &[Chip] {
        &self.children
    }

    /// Strip instances, or `None` when no marquee is attached
    pub fn strip(&self) -> Option<&[Chip]> {
        self.strip.as_deref()
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn clips_overflow(&self) -> bool {
        self.presentation.is_some_and(|p| p.clip_overflow)
    }
}

impl Viewport for TerminalViewport {
    type Item = Chip;

    fn width(&self) -> f64 {
        f64::from(self.area.width)
    }

    fn take_children(&mut self) -> Vec<Chip> {
        std::mem::take(&mut self.children)
    }

    fn restore_children(&mut self, children: Vec<Chip>) {
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

    fn push_to_strip(&mut self, item: Chip) {
        if let Some(strip) = self.strip.as_mut() {
            strip.push(item);
        }
    }

    fn measure_strip_item(&self, index: usize) -> f64 {
        self.strip
            .as_ref()
            .and_then(|strip| strip.get(index))
            .map(|chip| chip.cells() as f64)
            .unwrap_or(0.0)
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

/// Frame clock and listener registry for the terminal loop
#[derive(Debug, Default)]
pub struct TerminalPlatform {
    next_frame: u64,
    /// At most one callback per refresh
    scheduled: Option<FrameHandle>,
    next_listener: u64,
    listeners: HashMap<ListenerId, (ListenerScope, InputKind)>,
}

impl TerminalPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the callback due on this tick
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.scheduled.take()
    }

    pub fn has_scheduled_frame(&self) -> bool {
        self.scheduled.is_some()
    }

    pub fn is_listening(&self, scope: ListenerScope, kind: InputKind) -> bool {
        self.listeners
            .values()
            .any(|(s, k)| *s == scope && *k == kind)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl FrameClock for TerminalPlatform {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_frame += 1;
        let handle = FrameHandle(self.next_frame);
        self.scheduled = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.scheduled == Some(handle) {
            self.scheduled = None;
        }
    }
}

impl PointerStream for TerminalPlatform {
    fn listen(&mut self, scope: ListenerScope, kind: InputKind) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id, (scope, kind));
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::marquee::{InputEvent, MarqueeOptions};

    fn attach(width: u16) -> TerminalMarquee {
        let area = Rect::new(0, 2, width, 3);
        let viewport = TerminalViewport::from_labels(area, &["alpha", "beta", "gamma"], 4);
        Marquee::new(viewport, TerminalPlatform::new(), MarqueeOptions::new().gap(2.0))
    }

    #[test]
    fn test_chip_cells_include_padding() {
        assert_eq!(Chip::new("alpha", 0).cells(), 7);
        assert_eq!(Chip::new("", 0).cells(), 2);
    }

    #[test]
    fn test_marquee_measures_in_cells() {
        let marquee = attach(40);
        // (7 + 2) + (6 + 2) + (7 + 2) = 26 per set; six sets clear 40 + 100
        assert_eq!(marquee.loop_length(), 156.0);
        assert!(marquee.viewport().strip().is_some());
        assert!(marquee.viewport().children().is_empty());
        assert!(marquee.viewport().clips_overflow());
    }

    #[test]
    fn test_set_area_reports_width_changes_only() {
        let mut marquee = attach(40);
        assert!(!marquee.viewport_mut().set_area(Rect::new(0, 4, 40, 3)));
        assert!(marquee.viewport_mut().set_area(Rect::new(0, 4, 80, 3)));

        marquee.handle_input(InputEvent::Resized);
        let due = marquee.platform_mut().take_due().unwrap();
        marquee.on_frame(due);
        assert!(marquee.loop_length() >= 180.0);
    }

    #[test]
    fn test_destroy_returns_chips() {
        let mut marquee = attach(40);
        marquee.destroy();

        let labels: Vec<&str> = marquee
            .viewport()
            .children()
            .iter()
            .map(|chip| chip.label.as_str())
            .collect();
        assert_eq!(labels, ["alpha", "beta", "gamma"]);
        assert!(marquee.viewport().strip().is_none());
        assert_eq!(marquee.platform().listener_count(), 0);
        assert!(!marquee.platform().has_scheduled_frame());
        assert!(!marquee.viewport_mut().set_area(Rect::new(0, 0, 10, 3)));
    }
}
