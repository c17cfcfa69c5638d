//! Connection state machine.
//!
//! Pure bookkeeping: every input returns the effects the driver must carry
//! out. Timers and handshakes are tagged with the generation current when
//! they were started; `connect` and `disconnect` bump it, so a reconnect timer
//! or handshake racing an explicit close is recognized as stale and ignored.

use std::time::Duration;

use super::{ConnectionState, ReconnectState};
use crate::settings::LogSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Effect {
    OpenTransport { generation: u64 },
    CloseTransport,
    StartHeartbeat,
    StopHeartbeat,
    ScheduleReconnect { generation: u64, delay: Duration },
    CancelReconnect,
    Publish(ConnectionState),
}

#[derive(Debug, Default)]
pub(crate) struct ConnectionMachine {
    state: ConnectionState,
    reconnect: ReconnectState,
    generation: u64,
}

impl ConnectionMachine {
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn attempt_count(&self) -> u32 {
        self.reconnect.attempt_count()
    }

    /// Open a connection unless one is already open or opening.
    pub fn connect(&mut self) -> Vec<Effect> {
        if self.state != ConnectionState::Disconnected {
            return Vec::new();
        }
        self.generation += 1;
        self.state = ConnectionState::Connecting;
        vec![
            Effect::CancelReconnect,
            Effect::Publish(ConnectionState::Connecting),
            Effect::OpenTransport {
                generation: self.generation,
            },
        ]
    }

    pub fn handshake_succeeded(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.generation || self.state != ConnectionState::Connecting {
            return Vec::new();
        }
        self.state = ConnectionState::Connected;
        self.reconnect.reset();
        vec![
            Effect::StartHeartbeat,
            Effect::Publish(ConnectionState::Connected),
        ]
    }

    /// A handshake failed or an open connection dropped.
    pub fn connection_lost(&mut self, generation: u64, settings: &LogSettings) -> Vec<Effect> {
        if generation != self.generation || self.state == ConnectionState::Disconnected {
            return Vec::new();
        }
        self.state = ConnectionState::Disconnected;
        let mut effects = vec![
            Effect::StopHeartbeat,
            Effect::CloseTransport,
            Effect::Publish(ConnectionState::Disconnected),
        ];
        match self.reconnect.next_delay(settings) {
            Some(delay) => effects.push(Effect::ScheduleReconnect {
                generation: self.generation,
                delay,
            }),
            None => crate::log_warn!(
                "Giving up on the log stream after {} reconnect attempts",
                self.reconnect.attempt_count()
            ),
        }
        effects
    }

    pub fn reconnect_due(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.generation || self.state != ConnectionState::Disconnected {
            return Vec::new();
        }
        self.connect()
    }

    /// Deliberate close. Never schedules a reconnect.
    pub fn disconnect(&mut self) -> Vec<Effect> {
        self.generation += 1;
        self.reconnect.reset();
        let mut effects = vec![
            Effect::CancelReconnect,
            Effect::StopHeartbeat,
            Effect::CloseTransport,
        ];
        if self.state != ConnectionState::Disconnected {
            self.state = ConnectionState::Disconnected;
            effects.push(Effect::Publish(ConnectionState::Disconnected));
        }
        effects
    }
}
