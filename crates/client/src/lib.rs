//! LogDeck client - live log streaming pipeline
//!
//! Connects to a runtime's live-log WebSocket, keeps a bounded and
//! deduplicated cache of recent events, fans them out to subscribers and
//! computes filtered, windowed views over them. The Dioxus desktop viewer
//! lives behind the `desktop` feature.

pub mod logging;

pub mod endpoint;
pub mod log_stream;
pub mod settings;
pub mod storage;
pub mod stores;
pub mod view;
pub mod ws;

#[cfg(feature = "desktop")]
pub mod components;

pub use endpoint::Environment;
pub use log_stream::LogStream;
pub use logdeck_shared::{LogEvent, LogLevel};
pub use settings::{LogSettings, SettingsSource, SharedSettings};
pub use storage::Storage;
pub use stores::{LogStore, Subscription};
pub use view::{LogFilter, LogView};
pub use ws::{ConnectionState, Connector, TungsteniteConnector};
