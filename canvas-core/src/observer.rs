//! Subscribe/unsubscribe observer registry.
//!
//! Shared by the canvas store and the console message log. Callbacks run
//! synchronously on the notifying thread; the registry lock is released
//! before any callback is invoked, so callbacks may subscribe, unsubscribe or
//! read the notifying object.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Callback type stored by the registry.
pub type ObserverCallback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// A thread-safe list of observers for events of type `E`.
pub struct Observers<E> {
    next_id: AtomicU64,
    callbacks: RwLock<Vec<(SubscriptionId, ObserverCallback<E>)>>,
}

impl<E> Observers<E> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            callbacks: RwLock::new(Vec::new()),
        }
    }

    /// Register a callback. It stays registered until unsubscribed.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.callbacks
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((id, Arc::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` if the id was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self
            .callbacks
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let before = callbacks.len();
        callbacks.retain(|(sid, _)| *sid != id);
        before != callbacks.len()
    }

    /// Invoke every registered callback with `event`, in subscription order.
    pub fn notify(&self, event: &E) {
        let callbacks: Vec<ObserverCallback<E>> = self
            .callbacks
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        for callback in callbacks {
            callback(event);
        }
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.len())
            .finish_non_exhaustive()
    }
}
