//! WebSocket connection state, reconnect backoff and transport seam.
//!
//! This module provides the shared types; the state machine lives in
//! `machine` and the tokio-tungstenite transport in `connection_native`.

use async_trait::async_trait;
use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures_util::StreamExt;
use logdeck_shared::OutboundFrame;
use std::time::Duration;
use thiserror::Error;

use crate::settings::LogSettings;

mod connection_native;
pub(crate) mod machine;

pub use connection_native::TungsteniteConnector;

/// Keep-alive period while connected.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Ceiling of the reconnect delay.
pub const MAX_RECONNECT_DELAY: Duration = Duration::from_millis(30_000);

/// Connection state of the live-log socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectionState::Connecting)
    }
}

/// Delay before reconnect attempt number `attempt` (1-based).
///
/// Linear in the attempt number and capped at [`MAX_RECONNECT_DELAY`].
pub fn reconnect_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(attempt).min(MAX_RECONNECT_DELAY)
}

/// Reconnect bookkeeping for one manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconnectState {
    attempt_count: u32,
}

impl ReconnectState {
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn reset(&mut self) {
        self.attempt_count = 0;
    }

    /// Whether no further automatic attempt may be scheduled.
    pub fn is_exhausted(&self, settings: &LogSettings) -> bool {
        self.attempt_count >= settings.max_reconnect_attempts
    }

    /// Count one more attempt and return its delay, or `None` once the
    /// configured maximum has been reached.
    pub fn next_delay(&mut self, settings: &LogSettings) -> Option<Duration> {
        if self.is_exhausted(settings) {
            return None;
        }
        self.attempt_count += 1;
        Some(reconnect_delay(
            settings.reconnect_base_interval(),
            self.attempt_count,
        ))
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("websocket handshake failed: {0}")]
    Handshake(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("connection refused: {0}")]
    Refused(String),
}

/// An open duplex link carrying text frames.
///
/// Dropping the link closes the underlying socket.
#[derive(Debug)]
pub struct TransportLink {
    outbound: UnboundedSender<String>,
    inbound: UnboundedReceiver<String>,
}

impl TransportLink {
    pub fn new(outbound: UnboundedSender<String>, inbound: UnboundedReceiver<String>) -> Self {
        Self { outbound, inbound }
    }

    /// An in-memory link and the peer end that drives it.
    pub fn pair() -> (TransportLink, LinkPeer) {
        let (to_peer, from_client) = unbounded();
        let (to_client, from_peer) = unbounded();
        (
            TransportLink::new(to_peer, from_peer),
            LinkPeer {
                to_client,
                from_client,
            },
        )
    }

    pub fn send(&self, frame: OutboundFrame) -> Result<(), TransportError> {
        self.outbound
            .unbounded_send(frame.as_text().to_string())
            .map_err(|e| TransportError::Refused(format!("link closed: {}", e)))
    }

    /// Next text frame, or `None` once the peer has closed.
    pub async fn recv(&mut self) -> Option<String> {
        self.inbound.next().await
    }
}

/// The far end of an in-memory [`TransportLink`].
#[derive(Debug)]
pub struct LinkPeer {
    to_client: UnboundedSender<String>,
    from_client: UnboundedReceiver<String>,
}

impl LinkPeer {
    /// Deliver a text frame to the client. Returns `false` once the client
    /// side has been dropped.
    pub fn send(&self, text: impl Into<String>) -> bool {
        self.to_client.unbounded_send(text.into()).is_ok()
    }

    /// Next frame the client sent, or `None` once it closed the link.
    pub async fn recv(&mut self) -> Option<String> {
        self.from_client.next().await
    }

    /// Frames the client sent that are already queued.
    pub fn drain(&mut self) -> Vec<String> {
        let mut frames = Vec::new();
        while let Ok(Some(frame)) = self.from_client.try_next() {
            frames.push(frame);
        }
        frames
    }

    /// Whether the client side dropped its link.
    pub fn is_closed(&self) -> bool {
        self.to_client.is_closed()
    }

    /// Close from the peer side, as a server hanging up would.
    pub fn close(self) {}
}

/// Opens transport links to the live-log endpoint.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, url: &str) -> Result<TransportLink, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_ms: u64, max_attempts: u32) -> LogSettings {
        LogSettings {
            reconnect_base_interval_ms: base_ms,
            max_reconnect_attempts: max_attempts,
            ..LogSettings::default()
        }
    }

    #[test]
    fn state_predicates() {
        assert!(ConnectionState::Connected.is_connected());
        assert!(!ConnectionState::Connecting.is_connected());
        assert!(ConnectionState::Connecting.is_connecting());
        assert!(!ConnectionState::Disconnected.is_connecting());
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
    }

    #[test]
    fn delay_is_linear_and_capped() {
        let base = Duration::from_millis(4000);
        assert_eq!(reconnect_delay(base, 1), Duration::from_millis(4000));
        assert_eq!(reconnect_delay(base, 2), Duration::from_millis(8000));
        assert_eq!(reconnect_delay(base, 7), Duration::from_millis(28000));
        assert_eq!(reconnect_delay(base, 8), MAX_RECONNECT_DELAY);
        assert_eq!(reconnect_delay(base, u32::MAX), MAX_RECONNECT_DELAY);
    }

    #[test]
    fn attempts_freeze_at_maximum() {
        let settings = settings(3000, 3);
        let mut state = ReconnectState::default();
        let delays: Vec<_> = std::iter::from_fn(|| state.next_delay(&settings)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(3000),
                Duration::from_millis(6000),
                Duration::from_millis(9000),
            ]
        );
        assert_eq!(state.attempt_count(), 3);
        assert_eq!(state.next_delay(&settings), None);
        assert_eq!(state.attempt_count(), 3);

        state.reset();
        assert_eq!(state.next_delay(&settings), Some(Duration::from_millis(3000)));
    }

    #[test]
    fn maximum_is_read_each_time() {
        let mut state = ReconnectState::default();
        assert!(state.next_delay(&settings(1000, 1)).is_some());
        assert!(state.next_delay(&settings(1000, 1)).is_none());
        // raising the limit mid-session lets the next failure reschedule
        assert_eq!(
            state.next_delay(&settings(1000, 5)),
            Some(Duration::from_millis(2000))
        );
    }

    #[tokio::test]
    async fn in_memory_link_round_trip() {
        let (mut link, mut peer) = TransportLink::pair();
        link.send(OutboundFrame::KeepAlive).unwrap();
        assert_eq!(peer.recv().await.as_deref(), Some("ping"));

        assert!(peer.send("pong"));
        assert_eq!(link.recv().await.as_deref(), Some("pong"));

        peer.close();
        assert_eq!(link.recv().await, None);
    }
}
