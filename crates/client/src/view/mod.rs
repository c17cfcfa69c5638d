//! Filtering and windowed rendering of the cached log sequence.
//!
//! [`LogView`] is a pure model: it never talks to the store directly. The
//! caller feeds it snapshots, and it hands back the window to realize.

pub mod export;
pub mod filter;
pub mod window;

pub use export::{export_file_name, export_text, format_line, write_export};
pub use filter::{parse_timestamp, LogFilter};
pub use window::{compute_window, ScrollState, Viewport, VisibleRow, WindowLayout, OVERSCAN_ROWS};

use logdeck_shared::LogEvent;
use std::sync::Arc;

use crate::settings::LogSettings;

/// Filter, scroll position and filtered slice of one viewer.
#[derive(Debug, Clone)]
pub struct LogView {
    filter: LogFilter,
    scroll: ScrollState,
    source: Vec<Arc<LogEvent>>,
    filtered: Vec<Arc<LogEvent>>,
    row_height: f64,
    viewport_height: f64,
}

impl LogView {
    pub fn new(settings: &LogSettings) -> Self {
        Self {
            filter: LogFilter::default(),
            scroll: ScrollState::default(),
            source: Vec::new(),
            filtered: Vec::new(),
            row_height: settings.row_height(),
            viewport_height: 0.0,
        }
    }

    /// Take a new store snapshot and the current display metrics.
    ///
    /// Returns `true` when auto-scroll moved the offset.
    pub fn refresh(
        &mut self,
        snapshot: Vec<Arc<LogEvent>>,
        settings: &LogSettings,
        viewport_height: f64,
    ) -> bool {
        self.source = snapshot;
        self.row_height = settings.row_height();
        self.viewport_height = viewport_height.max(0.0);
        self.refilter()
    }

    /// Replace the filter and refilter the last snapshot.
    pub fn set_filter(&mut self, filter: LogFilter) -> bool {
        if filter == self.filter {
            return false;
        }
        self.filter = filter;
        // a new result set starts at the top, or at its tail when following
        self.scroll = ScrollState::new(self.scroll.auto_scroll);
        self.refilter()
    }

    pub fn filter(&self) -> &LogFilter {
        &self.filter
    }

    pub fn scroll_to(&mut self, offset: f64) {
        self.scroll.scroll_to(offset);
    }

    pub fn set_auto_scroll(&mut self, enabled: bool) {
        self.scroll.set_auto_scroll(enabled);
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    /// The viewport was resized. Returns `true` when auto-scroll moved the
    /// offset to keep the tail in view.
    pub fn set_viewport_height(&mut self, height: f64) -> bool {
        self.viewport_height = height.max(0.0);
        self.scroll.on_resize(self.row_height, self.viewport_height)
    }

    pub fn filtered(&self) -> &[Arc<LogEvent>] {
        &self.filtered
    }

    pub fn layout(&self) -> WindowLayout {
        compute_window(
            self.filtered.len(),
            self.row_height,
            self.scroll.viewport(self.viewport_height),
        )
    }

    /// Events of the current window with their row placement.
    pub fn visible(&self) -> Vec<(VisibleRow, Arc<LogEvent>)> {
        let layout = self.layout();
        layout
            .rows()
            .filter_map(|row| self.filtered.get(row.index).map(|e| (row, e.clone())))
            .collect()
    }

    /// Text export of everything the filter currently matches.
    pub fn export(&self) -> String {
        export_text(&self.filtered)
    }

    fn refilter(&mut self) -> bool {
        self.filtered = self.filter.apply(&self.source);
        self.scroll
            .on_len_changed(self.filtered.len(), self.row_height, self.viewport_height)
    }
}
