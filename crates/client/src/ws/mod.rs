//! WebSocket module for the live-log stream.
//!
//! This module provides:
//! - Connection state machine with linear, capped reconnect backoff
//! - Heartbeat while connected
//! - Direct writes to the log store (consumers read from the store, not frames)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │               ConnectionManager task                │
//! │   (state machine, heartbeat, reconnect timer)       │
//! └─────────────────────────────────────────────────────┘
//!                         │ TransportLink
//!                         ▼
//!            ┌─────────────────────────┐
//!            │  TungsteniteConnector   │
//!            │  (read/write pumps)     │
//!            └─────────────────────────┘
//!                         │ parsed LogEvents
//!                         ▼
//!              ┌─────────────────────┐
//!              │      LogStore       │
//!              │ (dedup, eviction,   │
//!              │  fan-out)           │
//!              └─────────────────────┘
//!                         │
//!          ┌──────────────┼──────────────┐
//!          ▼              ▼              ▼
//!   ┌────────────┐ ┌────────────┐ ┌────────────┐
//!   │  LogView   │ │  exporter  │ │ indicator  │
//!   └────────────┘ └────────────┘ └────────────┘
//! ```

pub mod connection;
mod manager;

pub use connection::{
    reconnect_delay, ConnectionState, Connector, LinkPeer, ReconnectState, TransportError,
    TransportLink, TungsteniteConnector, HEARTBEAT_INTERVAL, MAX_RECONNECT_DELAY,
};
pub use manager::ConnectionManager;
