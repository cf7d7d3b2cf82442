//! Explicitly owned battle sessions with idle-time eviction.
//!
//! Sessions (an in-progress battle, a pending challenge) belong to the
//! embedding service, never to the combat engine. Each entry expires after
//! `ttl` without a [`SessionStore::touch`]; the store is bounded and drops
//! the least recently touched entry when full.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::SessionConfig;

/// Store handle shared between request handlers and the reaper task.
pub type SharedSessionStore<K, V> = Arc<Mutex<SessionStore<K, V>>>;

struct Entry<V> {
    value: V,
    last_access: Instant,
}

pub struct SessionStore<K, V> {
    entries: HashMap<K, Entry<V>>,
    ttl: Duration,
    capacity: usize,
}

impl<K, V> SessionStore<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.ttl, config.capacity)
    }

    pub fn into_shared(self) -> SharedSessionStore<K, V> {
        Arc::new(Mutex::new(self))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts or replaces a session, returning the previous value.
    ///
    /// When the store is full, expired entries are dropped first and then the
    /// least recently touched one.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.last_access = now;
            return Some(std::mem::replace(&mut entry.value, value));
        }

        if self.entries.len() >= self.capacity {
            self.evict_expired();
        }
        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(
            key,
            Entry {
                value,
                last_access: now,
            },
        );
        None
    }

    /// Live session for `key`. Does not refresh its lifetime.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| !self.is_expired(entry))
            .map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let ttl = self.ttl;
        self.entries
            .get_mut(key)
            .filter(|entry| entry.last_access.elapsed() < ttl)
            .map(|entry| &mut entry.value)
    }

    /// Refreshes a live session. An expired session is dropped and `false`
    /// returned.
    pub fn touch(&mut self, key: &K) -> bool {
        let ttl = self.ttl;
        match self.entries.get_mut(key) {
            Some(entry) if entry.last_access.elapsed() < ttl => {
                entry.last_access = Instant::now();
                true
            }
            Some(_) => {
                self.entries.remove(key);
                false
            }
            None => false,
        }
    }

    /// Takes ownership of a session back from the store, expired or not.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Drops every expired session and returns how many were dropped.
    pub fn evict_expired(&mut self) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.last_access.elapsed() < ttl);
        before - self.entries.len()
    }

    /// Stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &Entry<V>) -> bool {
        entry.last_access.elapsed() >= self.ttl
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            tracing::debug!(capacity = self.capacity, "session store full, evicted oldest");
        }
    }
}

/// Spawns a task that evicts expired sessions every `period`.
///
/// The task holds a weak reference and exits once every strong handle to the
/// store is dropped.
pub fn spawn_reaper<K, V>(store: &SharedSessionStore<K, V>, period: Duration) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    let weak: Weak<Mutex<SessionStore<K, V>>> = Arc::downgrade(store);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let Some(store) = weak.upgrade() else {
                break;
            };
            let evicted = store.lock().await.evict_expired();
            if evicted > 0 {
                tracing::debug!(evicted, "reaped expired sessions");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn sessions_expire_after_ttl() {
        let mut store = SessionStore::new(TTL, 8);
        store.insert("ash", 1);

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(store.get(&"ash"), Some(&1));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.get(&"ash"), None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.evict_expired(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn touch_extends_lifetime() {
        let mut store = SessionStore::new(TTL, 8);
        store.insert("ash", 1);

        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(store.touch(&"ash"));
        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(store.contains_key(&"ash"));

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(!store.touch(&"ash"));
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn full_store_drops_least_recently_touched() {
        let mut store = SessionStore::new(TTL, 2);
        store.insert("a", 1);
        tokio::time::advance(Duration::from_secs(1)).await;
        store.insert("b", 2);
        tokio::time::advance(Duration::from_secs(1)).await;
        store.touch(&"a");

        store.insert("c", 3);

        assert_eq!(store.len(), 2);
        assert!(store.contains_key(&"a"));
        assert!(!store.contains_key(&"b"));
        assert!(store.contains_key(&"c"));
    }

    #[tokio::test]
    async fn insert_replaces_and_remove_returns_ownership() {
        let mut store = SessionStore::new(TTL, 2);
        assert_eq!(store.insert("a", 1), None);
        assert_eq!(store.insert("a", 2), Some(1));
        if let Some(value) = store.get_mut(&"a") {
            *value += 1;
        }
        assert_eq!(store.remove(&"a"), Some(3));
        assert_eq!(store.remove(&"a"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn reaper_evicts_and_stops_with_the_store() {
        let store = SessionStore::new(TTL, 8).into_shared();
        store.lock().await.insert("ash", 1);
        let reaper = spawn_reaper(&store, Duration::from_secs(1));

        tokio::time::sleep(Duration::from_secs(62)).await;
        tokio::task::yield_now().await;
        assert!(store.lock().await.is_empty());

        drop(store);
        reaper.await.expect("reaper exits cleanly");
    }
}
