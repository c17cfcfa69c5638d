//! Windowing over a filtered log sequence.
//!
//! Rows have a uniform height, so the visible slice, the total extent and
//! every row offset are computed arithmetically; nothing scales with the
//! number of rows outside the viewport.

use std::ops::Range;

/// Rows realized above and below the viewport to hide pop-in while scrolling.
pub const OVERSCAN_ROWS: usize = 5;

/// Visible part of the scroll container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_offset: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_offset: f64, height: f64) -> Self {
        Self {
            scroll_offset,
            height,
        }
    }
}

/// One row to realize and where to put it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRow {
    pub index: usize,
    /// Absolute distance from the top of the scrollable content.
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowLayout {
    /// Height of the whole filtered sequence.
    pub total_height: f64,
    pub row_height: f64,
    /// Indices to realize, overscan included.
    pub range: Range<usize>,
}

impl WindowLayout {
    pub fn rows(&self) -> impl Iterator<Item = VisibleRow> + '_ {
        self.range.clone().map(|index| VisibleRow {
            index,
            offset: index as f64 * self.row_height,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Compute which of `len` rows intersect the viewport.
pub fn compute_window(len: usize, row_height: f64, viewport: Viewport) -> WindowLayout {
    let total_height = len as f64 * row_height;
    if len == 0 || row_height <= 0.0 || viewport.height <= 0.0 {
        return WindowLayout {
            total_height: total_height.max(0.0),
            row_height,
            range: 0..0,
        };
    }

    let top = viewport.scroll_offset.max(0.0);
    let bottom = top + viewport.height;

    let first = (top / row_height).floor() as usize;
    if first >= len {
        // scrolled past the content: nothing intersects the viewport
        return WindowLayout {
            total_height,
            row_height,
            range: 0..0,
        };
    }
    // a row starting exactly at `bottom` still touches the viewport edge
    let last = ((bottom / row_height).floor() as usize + 1).min(len);

    let start = first.saturating_sub(OVERSCAN_ROWS);
    let end = (last + OVERSCAN_ROWS).min(len);

    WindowLayout {
        total_height,
        row_height,
        range: start..end.max(start),
    }
}

/// Scroll position with optional follow-the-tail behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub offset: f64,
    pub auto_scroll: bool,
    last_len: usize,
}

impl ScrollState {
    pub fn new(auto_scroll: bool) -> Self {
        Self {
            offset: 0.0,
            auto_scroll,
            last_len: 0,
        }
    }

    /// User scrolled.
    pub fn scroll_to(&mut self, offset: f64) {
        self.offset = offset.max(0.0);
    }

    pub fn set_auto_scroll(&mut self, enabled: bool) {
        self.auto_scroll = enabled;
    }

    /// The filtered sequence now has `len` rows. With auto-scroll on and
    /// more rows than before, jump so the last row is visible; otherwise the
    /// offset is left exactly as it was. Returns whether the offset moved.
    pub fn on_len_changed(&mut self, len: usize, row_height: f64, viewport_height: f64) -> bool {
        let grew = len > self.last_len;
        self.last_len = len;
        if !(self.auto_scroll && grew) {
            return false;
        }
        let bottom = (len as f64 * row_height - viewport_height).max(0.0);
        let moved = bottom != self.offset;
        self.offset = bottom;
        moved
    }

    /// The viewport was resized. With auto-scroll on, keep the last row
    /// pinned to the bottom. Returns whether the offset moved.
    pub fn on_resize(&mut self, row_height: f64, viewport_height: f64) -> bool {
        if !self.auto_scroll {
            return false;
        }
        let bottom = (self.last_len as f64 * row_height - viewport_height).max(0.0);
        let moved = bottom != self.offset;
        self.offset = bottom;
        moved
    }

    pub fn viewport(&self, height: f64) -> Viewport {
        Viewport::new(self.offset, height)
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequence_has_no_rows() {
        let layout = compute_window(0, 20.0, Viewport::new(0.0, 400.0));
        assert_eq!(layout.total_height, 0.0);
        assert!(layout.is_empty());
    }

    #[test]
    fn top_of_long_list() {
        let layout = compute_window(10_000, 20.0, Viewport::new(0.0, 400.0));
        assert_eq!(layout.total_height, 200_000.0);
        // rows 0..=20 touch [0, 400], plus 5 overscan below
        assert_eq!(layout.range, 0..26);
    }

    #[test]
    fn middle_of_long_list_has_overscan_both_sides() {
        let layout = compute_window(10_000, 20.0, Viewport::new(1_010.0, 400.0));
        // first visible row 50 (1000..1020), last 70 (1400..1420)
        assert_eq!(layout.range, 45..76);
        let rows: Vec<_> = layout.rows().collect();
        assert_eq!(rows.len(), 31);
        assert_eq!(rows[0], VisibleRow { index: 45, offset: 900.0 });
        assert_eq!(rows[30].offset, 75.0 * 20.0);
    }

    #[test]
    fn bottom_is_clamped() {
        let layout = compute_window(100, 20.0, Viewport::new(1_700.0, 400.0));
        assert_eq!(layout.range, 80..100);
    }

    #[test]
    fn offset_past_the_end_realizes_nothing() {
        let layout = compute_window(10, 20.0, Viewport::new(5_000.0, 400.0));
        assert!(layout.is_empty());
        assert_eq!(layout.total_height, 200.0);

        // the last row still counts while any of it is in view
        let layout = compute_window(10, 20.0, Viewport::new(190.0, 400.0));
        assert_eq!(layout.range, 4..10);
    }

    #[test]
    fn realized_rows_do_not_depend_on_total_volume() {
        let small = compute_window(1_000, 25.0, Viewport::new(5_000.0, 500.0));
        let large = compute_window(1_000_000, 25.0, Viewport::new(5_000.0, 500.0));
        assert_eq!(small.range, large.range);
    }

    #[test]
    fn auto_scroll_follows_new_rows() {
        let mut scroll = ScrollState::new(true);
        assert!(scroll.on_len_changed(100, 20.0, 400.0));
        assert_eq!(scroll.offset, 1_600.0);
        assert!(scroll.on_len_changed(101, 20.0, 400.0));
        assert_eq!(scroll.offset, 1_620.0);

        let layout = compute_window(101, 20.0, scroll.viewport(400.0));
        assert_eq!(layout.range.end, 101);
    }

    #[test]
    fn auto_scroll_waits_for_growth() {
        let mut scroll = ScrollState::new(true);
        scroll.on_len_changed(10, 20.0, 100.0);
        scroll.scroll_to(0.0);
        assert!(!scroll.on_len_changed(10, 20.0, 100.0));
        assert!(!scroll.on_len_changed(5, 20.0, 100.0));
        assert_eq!(scroll.offset, 0.0);
    }

    #[test]
    fn manual_position_is_preserved_without_auto_scroll() {
        let mut scroll = ScrollState::new(false);
        scroll.scroll_to(340.0);
        assert!(!scroll.on_len_changed(500, 20.0, 400.0));
        assert!(!scroll.on_len_changed(900, 20.0, 400.0));
        assert_eq!(scroll.offset, 340.0);
    }

    #[test]
    fn resize_keeps_tail_pinned_only_when_following() {
        let mut scroll = ScrollState::new(true);
        scroll.on_len_changed(100, 20.0, 400.0);
        assert!(scroll.on_resize(20.0, 600.0));
        assert_eq!(scroll.offset, 1_400.0);

        let mut manual = ScrollState::new(false);
        manual.on_len_changed(100, 20.0, 400.0);
        manual.scroll_to(300.0);
        assert!(!manual.on_resize(20.0, 600.0));
        assert_eq!(manual.offset, 300.0);
    }

    #[test]
    fn short_list_stays_at_top() {
        let mut scroll = ScrollState::new(true);
        scroll.on_len_changed(3, 20.0, 400.0);
        assert_eq!(scroll.offset, 0.0);
    }
}
