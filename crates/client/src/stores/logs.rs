//! Bounded, deduplicated store of live log events.
//!
//! The store is the single owner of the cached events and of both subscriber
//! registries. It is the only place the cache is mutated; everyone else reads
//! point-in-time snapshots.

use logdeck_shared::LogEvent;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use super::subscribers::{Registry, Subscription};
use crate::settings::SettingsSource;
use crate::ws::ConnectionState;

/// Insertion-ordered events plus an index of the ids they carry.
#[derive(Debug, Default)]
struct EventCache {
    events: VecDeque<Arc<LogEvent>>,
    ids: HashSet<String>,
}

impl EventCache {
    /// Append unless the id is already cached, then evict down to `max`.
    /// Returns `false` for a duplicate.
    fn insert(&mut self, event: Arc<LogEvent>, max: usize) -> bool {
        if !self.ids.insert(event.id.clone()) {
            return false;
        }
        self.events.push_back(event);
        while self.events.len() > max {
            if let Some(evicted) = self.events.pop_front() {
                self.ids.remove(&evicted.id);
            }
        }
        true
    }

    fn clear(&mut self) {
        self.events.clear();
        self.ids.clear();
    }
}

/// Event cache and dispatcher for the live-log stream.
pub struct LogStore {
    settings: Arc<dyn SettingsSource>,
    cache: Mutex<EventCache>,
    connection_state: Mutex<ConnectionState>,
    /// Orders state publication against subscriber replay.
    state_dispatch: Mutex<()>,
    event_subscribers: Arc<Registry<LogEvent>>,
    state_subscribers: Arc<Registry<ConnectionState>>,
}

impl LogStore {
    pub fn new(settings: Arc<dyn SettingsSource>) -> Self {
        Self {
            settings,
            cache: Mutex::new(EventCache::default()),
            connection_state: Mutex::new(ConnectionState::Disconnected),
            state_dispatch: Mutex::new(()),
            event_subscribers: Registry::new("log event"),
            state_subscribers: Registry::new("connection state"),
        }
    }

    /// Accept an event from the transport.
    ///
    /// Returns `false` when an event with the same id is already cached; in
    /// that case nothing changes and nobody is notified. Otherwise the event
    /// is appended, the oldest entries are evicted down to the configured
    /// bound, and then every event subscriber is told exactly once.
    pub fn ingest(&self, event: LogEvent) -> bool {
        let max = self.settings.current().max_cache_size;
        let event = Arc::new(event);
        {
            let mut cache = self.lock_cache();
            if !cache.insert(event.clone(), max) {
                crate::log_debug!("Dropping duplicate log event {}", event.id);
                return false;
            }
        }
        self.event_subscribers.notify(&event);
        true
    }

    /// Point-in-time copy of the cached events, oldest first.
    pub fn snapshot(&self) -> Vec<Arc<LogEvent>> {
        self.lock_cache().events.iter().cloned().collect()
    }

    /// Drop every cached event. Connection state is untouched.
    pub fn clear(&self) {
        self.lock_cache().clear();
        crate::log_debug!("Log cache cleared");
    }

    pub fn len(&self) -> usize {
        self.lock_cache().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct module names currently cached, sorted.
    pub fn modules(&self) -> Vec<String> {
        let cache = self.lock_cache();
        let modules: BTreeSet<&str> = cache.events.iter().map(|e| e.module.as_str()).collect();
        modules.into_iter().map(str::to_string).collect()
    }

    /// Subscribe to accepted events.
    pub fn on_event(&self, callback: impl Fn(&LogEvent) + Send + Sync + 'static) -> Subscription {
        self.event_subscribers.subscribe(Arc::new(callback))
    }

    /// Subscribe to connection state changes. The callback is invoked once
    /// right away with the current state, and every later state reaches it
    /// after that replay.
    ///
    /// The callback must not subscribe to connection changes itself.
    pub fn on_connection_change(
        &self,
        callback: impl Fn(&ConnectionState) + Send + Sync + 'static,
    ) -> Subscription {
        let callback: Arc<dyn Fn(&ConnectionState) + Send + Sync> = Arc::new(callback);
        let _dispatch = self.lock_dispatch();
        let subscription = self.state_subscribers.subscribe(callback.clone());
        let current = *self.lock_state();
        self.state_subscribers.notify_one(&callback, &current);
        subscription
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.lock_state()
    }

    /// Record a new connection state and tell the state subscribers.
    pub(crate) fn publish_connection_state(&self, state: ConnectionState) {
        let _dispatch = self.lock_dispatch();
        *self.lock_state() = state;
        self.state_subscribers.notify(&state);
    }

    fn lock_dispatch(&self) -> MutexGuard<'_, ()> {
        self.state_dispatch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_cache(&self) -> MutexGuard<'_, EventCache> {
        // No callback runs while this lock is held.
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_state(&self) -> MutexGuard<'_, ConnectionState> {
        self.connection_state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for LogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStore")
            .field("len", &self.len())
            .field("connection_state", &self.connection_state())
            .field("event_subscribers", &self.event_subscribers.len())
            .field("state_subscribers", &self.state_subscribers.len())
            .finish()
    }
}
