//! Callback registries with per-subscriber fault isolation.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

pub(crate) type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A set of callbacks notified with values of `T`.
///
/// The entry list is copied before notifying, so callbacks may subscribe or
/// unsubscribe (themselves included) while being invoked.
pub(crate) struct Registry<T> {
    name: &'static str,
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Callback<T>)>>,
}

impl<T: 'static> Registry<T> {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        })
    }

    pub fn subscribe(self: &Arc<Self>, callback: Callback<T>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, callback));

        let registry: Weak<Self> = Arc::downgrade(self);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.remove(id);
                }
            })),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Invoke every callback once. A panicking callback is logged and does
    /// not keep the others from running.
    pub fn notify(&self, value: &T) {
        let entries: Vec<(u64, Callback<T>)> = self.lock().clone();
        for (id, callback) in entries {
            if catch_unwind(AssertUnwindSafe(|| callback(value))).is_err() {
                crate::log_error!("{} subscriber #{} panicked; continuing", self.name, id);
            }
        }
    }

    /// Invoke a single callback with the same isolation as [`notify`](Self::notify).
    pub fn notify_one(&self, callback: &Callback<T>, value: &T) {
        if catch_unwind(AssertUnwindSafe(|| callback(value))).is_err() {
            crate::log_error!("{} subscriber panicked during registration", self.name);
        }
    }

    fn remove(&self, id: u64) {
        self.lock().retain(|(entry_id, _)| *entry_id != id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Callback<T>)>> {
        // Callbacks never run under this lock, poisoning only follows a bug
        // in the registry itself; keep serving the list.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Handle returned when subscribing.
///
/// Dropping it unsubscribes; so does [`unsubscribe`](Self::unsubscribe).
/// Both are idempotent.
#[must_use = "dropping a Subscription unsubscribes the callback"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
