//! Frame protocol for the live-log WebSocket.
//!
//! The endpoint speaks plain text frames. Keep-alive traffic is a bare
//! marker and is discriminated before any JSON parsing happens; every other
//! text frame is a JSON-encoded [`LogEvent`].

use serde::Deserialize;

use crate::error::FrameError;
use crate::models::{LogEvent, LogLevel};

/// Path of the live-log endpoint on the runtime's HTTP server.
pub const LIVE_LOG_PATH: &str = "/api/live-log";

/// Sent by the client on every heartbeat tick.
pub const KEEPALIVE_REQUEST: &str = "ping";

/// Sent by the server in answer to [`KEEPALIVE_REQUEST`].
pub const KEEPALIVE_REPLY: &str = "pong";

/// Event as it appears on the wire, before the level is checked.
#[derive(Deserialize)]
struct WireEvent {
    id: String,
    timestamp: String,
    level: String,
    module: String,
    message: String,
}

/// A decoded frame received from the server.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    KeepAlive,
    Event(LogEvent),
}

impl InboundFrame {
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FrameError::Empty);
        }
        if text == KEEPALIVE_REPLY {
            return Ok(InboundFrame::KeepAlive);
        }

        let wire: WireEvent = serde_json::from_str(text)?;
        if wire.id.trim().is_empty() {
            return Err(FrameError::MissingId);
        }
        let level: LogLevel = wire.level.parse()?;
        Ok(InboundFrame::Event(LogEvent {
            id: wire.id,
            timestamp: wire.timestamp,
            level,
            module: wire.module,
            message: wire.message,
        }))
    }
}

/// A frame the client sends to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundFrame {
    KeepAlive,
}

impl OutboundFrame {
    pub fn as_text(&self) -> &'static str {
        match self {
            OutboundFrame::KeepAlive => KEEPALIVE_REQUEST,
        }
    }
}
