//! Background task owning the live-log connection.
//!
//! One tokio task holds the state machine, the open link, the heartbeat
//! interval and the reconnect timer. The public handle only enqueues
//! commands, so `connect()` and `disconnect()` never block; outcomes arrive
//! through the store's connection-state subscribers.

use futures_util::future::BoxFuture;
use logdeck_shared::{InboundFrame, OutboundFrame};
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, Sleep};

use super::connection::machine::{ConnectionMachine, Effect};
use super::connection::{
    ConnectionState, Connector, TransportError, TransportLink, HEARTBEAT_INTERVAL,
};
use crate::settings::SettingsSource;
use crate::stores::LogStore;

#[derive(Debug)]
enum Command {
    Connect,
    Disconnect,
}

type Handshake = BoxFuture<'static, (u64, Result<TransportLink, TransportError>)>;

/// Handle to the connection task.
///
/// Dropping the handle closes the connection and ends the task.
#[derive(Debug)]
pub struct ConnectionManager {
    cmd_tx: mpsc::UnboundedSender<Command>,
    state_rx: watch::Receiver<ConnectionState>,
    _task: JoinHandle<()>,
}

impl ConnectionManager {
    /// Spawn the connection task on the current tokio runtime.
    ///
    /// The manager starts `Disconnected`; call [`connect`](Self::connect).
    pub fn spawn(
        url: impl Into<String>,
        connector: Arc<dyn Connector>,
        settings: Arc<dyn SettingsSource>,
        store: Arc<LogStore>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);

        let task = ConnectionTask {
            url: url.into(),
            connector,
            settings,
            store,
            state_tx,
            cmd_rx,
            machine: ConnectionMachine::default(),
            handshake: None,
            link: None,
            heartbeat: None,
            reconnect: None,
        };

        Self {
            cmd_tx,
            state_rx,
            _task: tokio::spawn(task.run()),
        }
    }

    /// Open the connection. No-op while connecting or connected.
    pub fn connect(&self) {
        let _ = self.cmd_tx.send(Command::Connect);
    }

    /// Close the connection and cancel any pending reconnect.
    pub fn disconnect(&self) {
        let _ = self.cmd_tx.send(Command::Disconnect);
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Watch channel following every state change.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }
}

struct ConnectionTask {
    url: String,
    connector: Arc<dyn Connector>,
    settings: Arc<dyn SettingsSource>,
    store: Arc<LogStore>,
    state_tx: watch::Sender<ConnectionState>,
    cmd_rx: mpsc::UnboundedReceiver<Command>,
    machine: ConnectionMachine,
    handshake: Option<Handshake>,
    link: Option<TransportLink>,
    heartbeat: Option<Interval>,
    reconnect: Option<(u64, Pin<Box<Sleep>>)>,
}

impl ConnectionTask {
    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                // Commands from the public handle
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(Command::Connect) => {
                        crate::log_debug!("Connect requested for {}", self.url);
                        let effects = self.machine.connect();
                        self.apply(effects);
                    }
                    Some(Command::Disconnect) => {
                        crate::log_info!("Disconnecting from {}", self.url);
                        let effects = self.machine.disconnect();
                        self.apply(effects);
                    }
                    None => {
                        // Handle dropped
                        let effects = self.machine.disconnect();
                        self.apply(effects);
                        return;
                    }
                },

                (generation, outcome) = next_handshake(&mut self.handshake) => match outcome {
                    Ok(link) => {
                        let effects = self.machine.handshake_succeeded(generation);
                        if effects.is_empty() {
                            crate::log_debug!("Discarding stale handshake #{}", generation);
                        } else {
                            self.link = Some(link);
                            self.apply(effects);
                        }
                    }
                    Err(e) => {
                        crate::log_warn!("Log stream connection to {} failed: {}", self.url, e);
                        self.lost(generation);
                    }
                },

                generation = next_reconnect(&mut self.reconnect) => {
                    crate::log_info!(
                        "Reconnecting to {} (attempt {})",
                        self.url,
                        self.machine.attempt_count()
                    );
                    let effects = self.machine.reconnect_due(generation);
                    self.apply(effects);
                }

                _ = next_tick(&mut self.heartbeat) => self.send_keepalive(),

                frame = next_frame(&mut self.link) => match frame {
                    Some(text) => self.handle_frame(&text),
                    None => {
                        crate::log_info!("Log stream {} closed by peer", self.url);
                        self.lost(self.machine.generation());
                    }
                },
            }
        }
    }

    fn lost(&mut self, generation: u64) {
        let settings = self.settings.current();
        let effects = self.machine.connection_lost(generation, &settings);
        self.apply(effects);
    }

    fn send_keepalive(&mut self) {
        let Some(link) = self.link.as_ref() else {
            return;
        };
        if let Err(e) = link.send(OutboundFrame::KeepAlive) {
            crate::log_warn!("Heartbeat to {} failed: {}", self.url, e);
            self.lost(self.machine.generation());
        }
    }

    fn handle_frame(&self, text: &str) {
        match InboundFrame::parse(text) {
            Ok(InboundFrame::KeepAlive) => {
                crate::log_debug!("Heartbeat reply from {}", self.url);
            }
            Ok(InboundFrame::Event(event)) => {
                self.store.ingest(event);
            }
            Err(e) => {
                crate::log_warn!("Dropping malformed frame from {}: {}", self.url, e);
            }
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::OpenTransport { generation } => {
                    let connector = self.connector.clone();
                    let url = self.url.clone();
                    self.handshake = Some(Box::pin(async move {
                        (generation, connector.connect(&url).await)
                    }));
                }
                Effect::CloseTransport => {
                    // dropping an in-flight handshake cancels it
                    self.handshake = None;
                    self.link = None;
                }
                Effect::StartHeartbeat => {
                    let mut interval = tokio::time::interval_at(
                        Instant::now() + HEARTBEAT_INTERVAL,
                        HEARTBEAT_INTERVAL,
                    );
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    self.heartbeat = Some(interval);
                }
                Effect::StopHeartbeat => self.heartbeat = None,
                Effect::ScheduleReconnect { generation, delay } => {
                    crate::log_info!(
                        "Scheduling reconnect to {} in {}ms (attempt {})",
                        self.url,
                        delay.as_millis(),
                        self.machine.attempt_count()
                    );
                    self.reconnect = Some((generation, Box::pin(tokio::time::sleep(delay))));
                }
                Effect::CancelReconnect => self.reconnect = None,
                Effect::Publish(state) => {
                    self.state_tx.send_replace(state);
                    self.store.publish_connection_state(state);
                }
            }
        }
    }
}

async fn next_handshake(
    slot: &mut Option<Handshake>,
) -> (u64, Result<TransportLink, TransportError>) {
    match slot.as_mut() {
        Some(handshake) => {
            let outcome = handshake.await;
            *slot = None;
            outcome
        }
        None => std::future::pending().await,
    }
}

async fn next_reconnect(slot: &mut Option<(u64, Pin<Box<Sleep>>)>) -> u64 {
    match slot.as_mut() {
        Some((generation, sleep)) => {
            sleep.as_mut().await;
            let generation = *generation;
            *slot = None;
            generation
        }
        None => std::future::pending().await,
    }
}

async fn next_tick(slot: &mut Option<Interval>) {
    match slot.as_mut() {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn next_frame(slot: &mut Option<TransportLink>) -> Option<String> {
    match slot.as_mut() {
        Some(link) => link.recv().await,
        None => std::future::pending().await,
    }
}
