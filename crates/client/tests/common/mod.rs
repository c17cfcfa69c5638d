//! In-memory transport for driving the connection manager in tests.

#![allow(dead_code)]

use async_trait::async_trait;
use logdeck_client::ws::{Connector, LinkPeer, TransportError, TransportLink};
use logdeck_client::{LogEvent, LogLevel, LogSettings};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// What the next connection attempt does.
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    Refuse,
    Accept,
}

/// Connector that follows a script and records when it was called.
///
/// Once the script runs out every further attempt is refused.
pub struct ScriptedConnector {
    script: Mutex<VecDeque<Outcome>>,
    attempts: Mutex<Vec<Instant>>,
    peers: mpsc::UnboundedSender<LinkPeer>,
}

impl ScriptedConnector {
    pub fn new(script: impl IntoIterator<Item = Outcome>) -> (Arc<Self>, mpsc::UnboundedReceiver<LinkPeer>) {
        let (peers, peer_rx) = mpsc::unbounded_channel();
        let connector = Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            attempts: Mutex::new(Vec::new()),
            peers,
        });
        (connector, peer_rx)
    }

    pub fn refusing() -> Arc<Self> {
        Self::new([]).0
    }

    pub fn attempts(&self) -> Vec<Instant> {
        self.attempts.lock().unwrap().clone()
    }

    /// Gaps between consecutive attempts.
    pub fn gaps(&self) -> Vec<Duration> {
        self.attempts()
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect()
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn connect(&self, _url: &str) -> Result<TransportLink, TransportError> {
        self.attempts.lock().unwrap().push(Instant::now());
        let outcome = self.script.lock().unwrap().pop_front().unwrap_or(Outcome::Refuse);
        match outcome {
            Outcome::Refuse => Err(TransportError::Refused("scripted refusal".into())),
            Outcome::Accept => {
                let (link, peer) = TransportLink::pair();
                let _ = self.peers.send(peer);
                Ok(link)
            }
        }
    }
}

pub fn settings(base_ms: u64, max_attempts: u32) -> LogSettings {
    LogSettings {
        reconnect_base_interval_ms: base_ms,
        max_reconnect_attempts: max_attempts,
        ..LogSettings::default()
    }
}

pub fn event(id: &str) -> LogEvent {
    LogEvent::new(id, "2024-05-01 10:00:00", LogLevel::Info, "core", format!("message {id}"))
}

pub fn frame(id: &str) -> String {
    serde_json::to_string(&event(id)).unwrap()
}

/// Timer deadlines land on millisecond ticks, so allow a little slack.
pub fn assert_gap(actual: Duration, expected_ms: u64) {
    let expected = Duration::from_millis(expected_ms);
    assert!(
        actual >= expected && actual <= expected + Duration::from_millis(5),
        "expected a gap of {expected:?}, got {actual:?}"
    );
}
