//! Live log viewer components.
//!
//! - `LogViewer`: toolbar, filters and the windowed log list
//! - `FilterBar`: text, level, module and date controls
//! - `ConnectionIndicator`: colored dot for the connection state

pub mod connection_indicator;
pub mod filter_bar;
pub mod log_viewer;

pub use connection_indicator::*;
pub use filter_bar::*;
pub use log_viewer::*;
