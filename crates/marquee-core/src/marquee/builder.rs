//! L3 Molecular Layer: Layout/duplication builder
//!
//! Fills the viewport's strip with clones of the original items: enough full
//! repetitions to exceed the viewport plus [`SEAM_BUFFER`] (the base content,
//! whose width is the loop length), followed by a seam buffer at least one
//! viewport wide so a wraparound never exposes empty space.

use tracing::{debug, warn};

use super::host::{Item, ItemBehaviors, Viewport};

/// Extra base-content width beyond the viewport
pub const SEAM_BUFFER: f64 = 100.0;

/// Ceiling on repetitions, guarding against unstable measurements
pub const MAX_REPETITIONS: usize = 1000;

/// Identity of one strip instance. Never reused within an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

/// Allocates instance ids
#[derive(Debug, Default)]
pub struct InstanceIds {
    next: u64,
}

impl InstanceIds {
    pub fn next_id(&mut self) -> InstanceId {
        let id = InstanceId(self.next);
        self.next += 1;
        id
    }
}

/// One instance in the strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripEntry {
    pub id: InstanceId,
    /// Index of the original item this instance was cloned from
    pub source: usize,
    /// Measured width plus gap
    pub width: f64,
}

/// How a build finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildOutcome {
    /// No items to lay out
    #[default]
    Empty,
    /// Items have no extent and there is no gap; nothing to animate
    Degenerate,
    /// Coverage requirements met
    Complete,
    /// Repetition ceiling hit before coverage was reached
    Truncated,
}

/// Result of one build
#[derive(Debug, Clone, Default)]
pub struct StripLayout {
    pub entries: Vec<StripEntry>,
    /// Number of leading entries forming the base content
    pub base_len: usize,
    /// Width of the base content, zero when not measurable
    pub loop_length: f64,
    /// Width of the entries after the base content
    pub buffer_width: f64,
    pub outcome: BuildOutcome,
}

/// Rebuild the strip from scratch for the viewport's current width
pub fn build_strip<V: Viewport>(
    viewport: &mut V,
    originals: &[V::Item],
    gap: f64,
    ids: &mut InstanceIds,
) -> StripLayout {
    viewport.clear_strip();

    let mut layout = StripLayout::default();
    if originals.is_empty() {
        debug!("Marquee has no items; strip left empty");
        return layout;
    }

    let viewport_width = sanitize(viewport.width());
    let mut builder = Builder {
        viewport,
        originals,
        gap,
        ids,
        entries: Vec::new(),
    };

    let first_set_width = builder.append_set(false);
    if first_set_width == 0.0 && gap == 0.0 {
        warn!(
            "Marquee items measured zero width with zero gap; skipping duplication of {} items",
            originals.len()
        );
        layout.entries = builder.entries;
        layout.base_len = layout.entries.len();
        layout.outcome = BuildOutcome::Degenerate;
        return layout;
    }

    let target = viewport_width + SEAM_BUFFER;
    let mut loop_length = first_set_width;
    let mut repetitions = 1;
    while loop_length < target && repetitions < MAX_REPETITIONS {
        loop_length += builder.append_set(true);
        repetitions += 1;
    }
    let mut truncated = loop_length < target;

    let base: Vec<usize> = builder.entries.iter().map(|entry| entry.source).collect();
    let buffer_limit = MAX_REPETITIONS * originals.len();
    let mut buffer_width = 0.0;
    let mut appended = 0;
    while buffer_width < viewport_width && appended < buffer_limit {
        let source = base[appended % base.len()];
        buffer_width += builder.append(source, true);
        appended += 1;
    }
    truncated |= buffer_width < viewport_width;

    if truncated {
        warn!(
            "Marquee strip hit the repetition ceiling: loop {:.1} of {:.1}, buffer {:.1} of {:.1}",
            loop_length, target, buffer_width, viewport_width
        );
    }

    layout.base_len = base.len();
    layout.entries = builder.entries;
    layout.loop_length = loop_length;
    layout.buffer_width = buffer_width;
    layout.outcome = if truncated {
        BuildOutcome::Truncated
    } else {
        BuildOutcome::Complete
    };

    debug!(
        "Built marquee strip: {} instances ({} base, {} repetitions), loop length {:.1}, viewport {:.1}",
        layout.entries.len(),
        layout.base_len,
        repetitions,
        layout.loop_length,
        viewport_width
    );

    layout
}

struct Builder<'a, V: Viewport> {
    viewport: &'a mut V,
    originals: &'a [V::Item],
    gap: f64,
    ids: &'a mut InstanceIds,
    entries: Vec<StripEntry>,
}

impl<V: Viewport> Builder<'_, V> {
    /// Append one clone of every original in order, returning the added width
    fn append_set(&mut self, duplicate: bool) -> f64 {
        (0..self.originals.len())
            .map(|source| self.append(source, duplicate))
            .sum()
    }

    /// Clone one original into the strip and measure it in place
    fn append(&mut self, source: usize, duplicate: bool) -> f64 {
        let original = &self.originals[source];
        let mut instance = original.duplicate();
        instance.apply_behaviors(original.behaviors().union(ItemBehaviors::strip_defaults()));
        if duplicate {
            instance.mark_duplicate();
        }

        self.viewport.push_to_strip(instance);
        let index = self.entries.len();
        // Width can depend on layout context, so measure after attaching
        let width = sanitize(self.viewport.measure_strip_item(index)) + self.gap;

        self.entries.push(StripEntry {
            id: self.ids.next_id(),
            source,
            width,
        });
        width
    }
}

#[inline]
fn sanitize(width: f64) -> f64 {
    if width.is_finite() {
        width.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessItem, HeadlessViewport};

    fn viewport(width: f64, widths: &[f64]) -> (HeadlessViewport, Vec<HeadlessItem>) {
        let items: Vec<HeadlessItem> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| HeadlessItem::new(format!("item-{}", i), *w))
            .collect();
        let mut viewport = HeadlessViewport::new(width, Vec::new());
        viewport.mount_strip();
        (viewport, items)
    }

    #[test]
    fn test_empty_items() {
        let (mut viewport, _) = viewport(300.0, &[]);
        let layout = build_strip(&mut viewport, &[], 10.0, &mut InstanceIds::default());

        assert_eq!(layout.outcome, BuildOutcome::Empty);
        assert_eq!(layout.loop_length, 0.0);
        assert!(viewport.strip().is_empty());
    }

    #[test]
    fn test_coverage_invariant() {
        for width in [0.0, 37.0, 300.0, 1280.0, 4000.0] {
            let (mut viewport, items) = viewport(width, &[50.0, 80.0, 30.0]);
            let layout = build_strip(&mut viewport, &items, 12.0, &mut InstanceIds::default());

            assert_eq!(layout.outcome, BuildOutcome::Complete);
            assert!(layout.loop_length >= width + SEAM_BUFFER, "loop too short at {}", width);
            assert!(layout.buffer_width >= width, "buffer too short at {}", width);
            // Base content is whole repetitions of the item set
            assert_eq!(layout.base_len % items.len(), 0);
            assert_eq!(viewport.strip().len(), layout.entries.len());
        }
    }

    #[test]
    fn test_loop_length_is_sum_of_base_widths() {
        let (mut viewport, items) = viewport(200.0, &[40.0, 60.0]);
        let layout = build_strip(&mut viewport, &items, 10.0, &mut InstanceIds::default());

        // One set is 50 + 70 = 120; two sets reach 240 < 300, three reach 360
        assert_eq!(layout.base_len, 6);
        assert_eq!(layout.loop_length, 360.0);
        let base_sum: f64 = layout.entries[..layout.base_len].iter().map(|e| e.width).sum();
        assert_eq!(base_sum, layout.loop_length);
    }

    #[test]
    fn test_seam_continuity() {
        let (mut viewport, items) = viewport(500.0, &[90.0, 45.0, 120.0]);
        let layout = build_strip(&mut viewport, &items, 8.0, &mut InstanceIds::default());

        let base = &layout.entries[..layout.base_len];
        for (offset, entry) in layout.entries[layout.base_len..].iter().enumerate() {
            assert_eq!(entry.source, base[offset % base.len()].source);
        }
        let strip = viewport.strip();
        assert_eq!(strip[layout.base_len].label, strip[0].label);
    }

    #[test]
    fn test_zero_width_items_with_gap_terminate() {
        let (mut viewport, items) = viewport(100.0, &[0.0, 0.0]);
        let layout = build_strip(&mut viewport, &items, 5.0, &mut InstanceIds::default());

        assert_eq!(layout.outcome, BuildOutcome::Complete);
        assert_eq!(layout.loop_length, 200.0);
        assert!(layout.buffer_width >= 100.0);
    }

    #[test]
    fn test_zero_width_zero_gap_is_guarded() {
        let (mut viewport, items) = viewport(100.0, &[0.0, 0.0, 0.0]);
        let layout = build_strip(&mut viewport, &items, 0.0, &mut InstanceIds::default());

        assert_eq!(layout.outcome, BuildOutcome::Degenerate);
        assert_eq!(layout.loop_length, 0.0);
        // The first set stays as built
        assert_eq!(viewport.strip().len(), 3);
    }

    #[test]
    fn test_repetition_ceiling() {
        let (mut viewport, items) = viewport(1_000_000.0, &[1.0]);
        let layout = build_strip(&mut viewport, &items, 0.0, &mut InstanceIds::default());

        assert_eq!(layout.outcome, BuildOutcome::Truncated);
        assert_eq!(layout.base_len, MAX_REPETITIONS);
        assert_eq!(layout.loop_length, MAX_REPETITIONS as f64);
    }

    #[test]
    fn test_clones_get_behaviors_and_duplicate_marks() {
        let (mut viewport, items) = viewport(100.0, &[30.0]);
        let layout = build_strip(&mut viewport, &items, 0.0, &mut InstanceIds::default());

        let strip = viewport.strip();
        assert!(layout.entries.len() > 1);
        assert!(strip.iter().all(|item| item.applied.suppress_native_drag));
        assert!(!strip[0].duplicate);
        assert!(strip[1..].iter().all(|item| item.duplicate));
        // Originals are never mutated
        assert!(!items[0].applied.suppress_native_drag);
    }

    #[test]
    fn test_rebuild_replaces_instances() {
        let (mut viewport, items) = viewport(100.0, &[30.0]);
        let mut ids = InstanceIds::default();
        let first = build_strip(&mut viewport, &items, 0.0, &mut ids);
        let second = build_strip(&mut viewport, &items, 0.0, &mut ids);

        assert_eq!(viewport.strip().len(), second.entries.len());
        assert!(first
            .entries
            .iter()
            .all(|old| second.entries.iter().all(|new| new.id != old.id)));
    }
}
