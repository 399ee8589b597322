//! Owned listener registries with drop-scoped teardown.
//!
//! Every page signal (scroll offsets, frame ticks) is a [`Listeners`] table.
//! Subscribing hands back a [`Subscription`] guard; dropping or cancelling the
//! guard removes the listener, so a component that owns its guards cannot leak
//! a registration past its own lifetime.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

type Listener<T> = Box<dyn FnMut(&T) + Send>;

struct ListenerTable<T> {
    next_id: u64,
    entries: BTreeMap<u64, Listener<T>>,
}

impl<T> ListenerTable<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: BTreeMap::new(),
        }
    }
}

fn lock<T>(table: &Mutex<ListenerTable<T>>) -> MutexGuard<'_, ListenerTable<T>> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Listeners<T> {
    table: Arc<Mutex<ListenerTable<T>>>,
}

impl<T> Clone for Listeners<T> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<T: 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Listeners<T> {
    pub fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new(ListenerTable::new())),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&T) + Send + 'static,
    {
        let id = {
            let mut table = lock(&self.table);
            let id = table.next_id;
            table.next_id += 1;
            table.entries.insert(id, Box::new(listener));
            id
        };

        let weak: Weak<Mutex<ListenerTable<T>>> = Arc::downgrade(&self.table);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(table) = weak.upgrade() {
                    lock(&table).entries.remove(&id);
                }
            })),
        }
    }

    /// Calls every live listener in subscription order.
    ///
    /// Listeners run while the table is locked: they must not subscribe to or
    /// cancel subscriptions on the same registry.
    pub fn emit(&self, value: &T) {
        let mut table = lock(&self.table);
        for listener in table.entries.values_mut() {
            listener(value);
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.table).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registration guard returned by [`Listeners::subscribe`].
#[must_use = "dropping a Subscription immediately removes the listener"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn cancel(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn dropping_subscription_removes_listener() {
        let listeners = Listeners::<u32>::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        let subscription = listeners.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        listeners.emit(&1);
        assert_eq!(listeners.len(), 1);

        drop(subscription);
        listeners.emit(&2);
        assert!(listeners.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancel_only_removes_its_own_listener() {
        let listeners = Listeners::<u32>::new();
        let first = listeners.subscribe(|_| {});
        let _second = listeners.subscribe(|_| {});

        first.cancel();
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn subscription_outliving_registry_releases_quietly() {
        let listeners = Listeners::<u32>::new();
        let subscription = listeners.subscribe(|_| {});
        drop(listeners);
        drop(subscription);
    }
}
