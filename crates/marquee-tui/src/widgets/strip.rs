use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthChar;

use crate::host::{Chip, TerminalViewport};
use crate::theme::Theme;

/// Paints the marquee strip translated by the viewport offset
///
/// With no strip mounted the viewport's own children are drawn in place,
/// left aligned, the way they sit before a marquee attaches.
pub struct StripWidget<'a> {
    viewport: &'a TerminalViewport,
    theme: &'a Theme,
}

impl<'a> StripWidget<'a> {
    pub fn new(viewport: &'a TerminalViewport, theme: &'a Theme) -> Self {
        Self { viewport, theme }
    }
}

impl Widget for StripWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        buf.set_style(area, Style::default().bg(self.theme.bg0));

        let (chips, offset, gap) = match self.viewport.strip() {
            Some(strip) => (strip, self.viewport.offset(), self.viewport.gap()),
            None => (self.viewport.children(), 0.0, self.viewport.gap()),
        };

        let width = f64::from(area.width);
        let mut x = -offset;
        for chip in chips {
            if x >= width {
                break;
            }
            let cells = chip.cells() as f64;
            if x + cells > 0.0 {
                // Round half up so whole-cell neighbours stay flush at .5 offsets
                let left = (x + 0.5).floor() as i64;
                paint_chip(buf, area, chip, left, self.theme);
            }
            x += cells + gap;
        }
    }
}

/// Paint one chip whose left edge sits at `left` cells from the area's left
/// edge, clipped to the area
fn paint_chip(buf: &mut Buffer, area: Rect, chip: &Chip, left: i64, theme: &Theme) {
    let bg = theme.chip_bg(chip.tone);
    let mut style = Style::default().fg(theme.chip_fg).bg(bg);
    if !chip.duplicate {
        style = style.add_modifier(Modifier::BOLD);
    }

    let right = left + chip.cells() as i64;
    let visible = |col: i64| col >= 0 && col < i64::from(area.width);

    for row in area.top()..area.bottom() {
        for col in left.max(0)..right.min(i64::from(area.width)) {
            buf[(area.x + col as u16, row)].set_char(' ').set_style(style);
        }
    }

    let label_row = area.y + area.height / 2;
    let mut col = left + Chip::PADDING as i64;
    for ch in chip.label.chars() {
        let w = ch.width().unwrap_or(0) as i64;
        if w == 0 {
            continue;
        }
        // Wide glyphs are only drawn when both halves fit
        if visible(col) && visible(col + w - 1) {
            buf[(area.x + col as u16, label_row)]
                .set_char(ch)
                .set_style(style);
        }
        col += w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::marquee::{InputEvent, Marquee, MarqueeOptions, Viewport};

    use crate::host::{TerminalMarquee, TerminalPlatform};

    fn row_text(buf: &Buffer, area: Rect, row: u16) -> String {
        (area.left()..area.right())
            .map(|x| buf[(x, row)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_renders_children_without_strip() {
        let area = Rect::new(0, 0, 20, 1);
        let viewport = TerminalViewport::from_labels(area, &["ab", "cd"], 2);
        let theme = Theme::default();
        let mut buf = Buffer::empty(area);

        StripWidget::new(&viewport, &theme).render(area, &mut buf);

        assert_eq!(row_text(&buf, area, 0), " ab  cd             ");
    }

    #[test]
    fn test_strip_shifts_by_offset() {
        let area = Rect::new(0, 0, 12, 1);
        let viewport = TerminalViewport::from_labels(area, &["ab", "cd"], 2);
        let mut marquee = Marquee::new(
            viewport,
            TerminalPlatform::new(),
            MarqueeOptions::new().gap(1.0).speed(0.0),
        );
        let theme = Theme::default();

        let mut buf = Buffer::empty(area);
        StripWidget::new(marquee.viewport(), &theme).render(area, &mut buf);
        assert_eq!(row_text(&buf, area, 0), " ab   cd   a");

        // Two cells to the left
        marquee.viewport_mut().set_strip_offset(2.0);
        let mut buf = Buffer::empty(area);
        StripWidget::new(marquee.viewport(), &theme).render(area, &mut buf);
        assert_eq!(row_text(&buf, area, 0), "b   cd   ab ");
    }

    /// Gapless strip of "ab", "cd", so every painted cell belongs to a chip
    fn gapless(width: u16, speed: f64) -> TerminalMarquee {
        let area = Rect::new(0, 0, width, 1);
        let viewport = TerminalViewport::from_labels(area, &["ab", "cd"], 2);
        Marquee::new(
            viewport,
            TerminalPlatform::new(),
            MarqueeOptions::new().gap(0.0).speed(speed),
        )
    }

    /// Cells left at the band background
    fn bare_cells(marquee: &TerminalMarquee, theme: &Theme) -> usize {
        let area = marquee.viewport().area();
        let mut buf = Buffer::empty(area);
        StripWidget::new(marquee.viewport(), theme).render(area, &mut buf);
        (area.left()..area.right())
            .filter(|&x| buf[(x, area.y)].bg == theme.bg0)
            .count()
    }

    fn drag(marquee: &mut TerminalMarquee, distance: f64) {
        marquee.handle_input(InputEvent::PointerDown { x: 0.0 });
        marquee.handle_input(InputEvent::PointerMove { x: distance });
        marquee.handle_input(InputEvent::PointerUp);
    }

    #[test]
    fn test_drag_keeps_band_covered_while_paused() {
        let theme = Theme::default();
        let mut marquee = gapless(12, 0.0);
        marquee.pause();

        drag(&mut marquee, 5.0);
        assert!((0.0..marquee.loop_length()).contains(&marquee.position()));
        assert_eq!(bare_cells(&marquee, &theme), 0);

        drag(&mut marquee, 300.0);
        assert!((0.0..marquee.loop_length()).contains(&marquee.position()));
        assert_eq!(marquee.viewport().offset(), marquee.position());
        assert_eq!(bare_cells(&marquee, &theme), 0);

        drag(&mut marquee, -1000.0);
        assert_eq!(bare_cells(&marquee, &theme), 0);
    }

    #[test]
    fn test_band_covered_across_resize_and_frames() {
        let theme = Theme::default();
        let mut marquee = gapless(12, 3.0);
        marquee.pause();
        drag(&mut marquee, 7.0);

        // Widen while paused: the strip must already cover the new band
        assert!(marquee.viewport_mut().set_area(Rect::new(0, 0, 200, 1)));
        marquee.handle_input(InputEvent::Resized);
        assert_eq!(bare_cells(&marquee, &theme), 0);

        marquee.play();
        for _ in 0..150 {
            if let Some(handle) = marquee.platform_mut().take_due() {
                marquee.on_frame(handle);
            }
            assert_eq!(bare_cells(&marquee, &theme), 0, "at {}", marquee.position());
        }

        // Narrow again while running: rebuilt on the next frame
        assert!(marquee.viewport_mut().set_area(Rect::new(0, 0, 30, 1)));
        marquee.handle_input(InputEvent::Resized);
        for _ in 0..60 {
            if let Some(handle) = marquee.platform_mut().take_due() {
                marquee.on_frame(handle);
            }
            assert_eq!(bare_cells(&marquee, &theme), 0, "at {}", marquee.position());
        }
    }

    #[test]
    fn test_half_cell_offset_leaves_no_seam() {
        let theme = Theme::default();
        let mut marquee = gapless(12, 0.0);
        marquee.pause();

        for offset in [0.5, 2.5, 3.5, 17.5] {
            marquee.viewport_mut().set_strip_offset(offset);
            assert_eq!(bare_cells(&marquee, &theme), 0, "at {offset}");
        }
    }

    #[test]
    fn test_label_sits_on_middle_row() {
        let area = Rect::new(2, 1, 8, 3);
        let viewport = TerminalViewport::from_labels(area, &["xy"], 1);
        let theme = Theme::default();
        let mut buf = Buffer::empty(Rect::new(0, 0, 12, 5));

        StripWidget::new(&viewport, &theme).render(area, &mut buf);

        assert_eq!(row_text(&buf, area, 1), " ".repeat(8));
        assert_eq!(row_text(&buf, area, 2).trim_end(), " xy");
        assert_eq!(buf[(3, 1)].bg, theme.chip_bg(0));
    }
}
