//! Composition root for the live-log pipeline.

use logdeck_shared::LogEvent;
use std::sync::Arc;
use tokio::sync::watch;

use crate::settings::SettingsSource;
use crate::stores::{LogStore, Subscription};
use crate::ws::{ConnectionManager, ConnectionState, Connector, TungsteniteConnector};

/// One store and the connection feeding it.
///
/// Build it once at startup and share it; there is no global instance.
/// Must be created inside a tokio runtime because the connection task is
/// spawned immediately (in the `Disconnected` state).
#[derive(Debug, Clone)]
pub struct LogStream {
    store: Arc<LogStore>,
    manager: Arc<ConnectionManager>,
}

impl LogStream {
    pub fn new(url: impl Into<String>, settings: Arc<dyn SettingsSource>) -> Self {
        Self::with_connector(url, settings, Arc::new(TungsteniteConnector))
    }

    /// Use a custom transport, mainly for tests.
    pub fn with_connector(
        url: impl Into<String>,
        settings: Arc<dyn SettingsSource>,
        connector: Arc<dyn Connector>,
    ) -> Self {
        let store = Arc::new(LogStore::new(settings.clone()));
        let manager = ConnectionManager::spawn(url, connector, settings, store.clone());
        Self {
            store,
            manager: Arc::new(manager),
        }
    }

    pub fn connect(&self) {
        self.manager.connect();
    }

    pub fn disconnect(&self) {
        self.manager.disconnect();
    }

    pub fn on_event(&self, callback: impl Fn(&LogEvent) + Send + Sync + 'static) -> Subscription {
        self.store.on_event(callback)
    }

    pub fn on_connection_change(
        &self,
        callback: impl Fn(&ConnectionState) + Send + Sync + 'static,
    ) -> Subscription {
        self.store.on_connection_change(callback)
    }

    pub fn snapshot(&self) -> Vec<Arc<LogEvent>> {
        self.store.snapshot()
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.manager.state()
    }

    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.manager.watch_state()
    }

    pub fn store(&self) -> &Arc<LogStore> {
        &self.store
    }
}
