use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use catalog_cache_core::{CacheError, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::broadcast;

type Inflight<V> = DashMap<String, broadcast::Sender<Result<V>>>;

/// Per-key de-duplication of remote fetches
///
/// Concurrent cold misses for one key share a single fetch, and at most one
/// background refresh per key runs at a time.
pub struct Coalescer<V> {
    // key -> sender broadcasting the leader's result
    inflight: Arc<Inflight<V>>,
    // keys with a background refresh running
    refreshing: Arc<DashMap<String, ()>>,
    // spawned refresh tasks not yet finished
    active: Arc<AtomicUsize>,
}

impl<V> Clone for Coalescer<V> {
    fn clone(&self) -> Self {
        Self {
            inflight: self.inflight.clone(),
            refreshing: self.refreshing.clone(),
            active: self.active.clone(),
        }
    }
}

impl<V> Default for Coalescer<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes the leader's map entry even if the leader future is dropped
struct LeaderGuard<'a, V> {
    inflight: &'a Inflight<V>,
    key: &'a str,
}

impl<V> Drop for LeaderGuard<'_, V> {
    fn drop(&mut self) {
        self.inflight.remove(self.key);
    }
}

/// Releases a background refresh slot when the task ends, panics included
struct RefreshGuard {
    refreshing: Arc<DashMap<String, ()>>,
    active: Arc<AtomicUsize>,
    // set only when the key was claimed in `refreshing`
    key: Option<String>,
}

impl RefreshGuard {
    fn new(
        refreshing: Arc<DashMap<String, ()>>,
        active: Arc<AtomicUsize>,
        key: Option<String>,
    ) -> Self {
        active.fetch_add(1, Ordering::AcqRel);
        Self {
            refreshing,
            active,
            key,
        }
    }
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        if let Some(key) = &self.key {
            self.refreshing.remove(key);
        }
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<V> Coalescer<V> {
    pub fn new() -> Self {
        Self {
            inflight: Arc::new(DashMap::new()),
            refreshing: Arc::new(DashMap::new()),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of background refresh tasks still running
    pub fn pending_refreshes(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }
}

impl<V: Clone + Send + 'static> Coalescer<V> {
    /// Execute a request with coalescing for the given key.
    /// If a request for this key is already running, wait for its result.
    /// Otherwise, run the request and broadcast the result.
    pub async fn do_request<F, Fut>(&self, key: &str, f: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        // scope so the DashMap shard lock is released before awaiting
        let action = match self.inflight.entry(key.to_string()) {
            Entry::Occupied(o) => Ok(o.get().subscribe()),
            Entry::Vacant(v) => {
                let (tx, _rx) = broadcast::channel(1);
                v.insert(tx.clone());
                Err(tx)
            }
        };

        match action {
            Ok(mut rx) => match rx.recv().await {
                Ok(res) => res,
                // leader was dropped before it could send
                Err(_) => Err(CacheError::Internal(format!(
                    "in-flight fetch for {key} was abandoned"
                ))),
            },
            Err(tx) => {
                let guard = LeaderGuard {
                    inflight: &self.inflight,
                    key,
                };
                let result = f().await;
                drop(guard);

                if tx.receiver_count() > 0 {
                    let _ = tx.send(result.clone());
                }
                result
            }
        }
    }

    /// Spawn a detached background refresh for `key`.
    ///
    /// With `dedupe` set, this is a no-op while another refresh for the same
    /// key is running. Returns whether a task was spawned.
    pub fn spawn_refresh<F, Fut>(&self, key: &str, dedupe: bool, task_factory: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let claimed = if dedupe {
            match self.refreshing.entry(key.to_string()) {
                Entry::Vacant(v) => {
                    v.insert(());
                    Some(key.to_string())
                }
                Entry::Occupied(_) => return false,
            }
        } else {
            None
        };

        let guard = RefreshGuard::new(self.refreshing.clone(), self.active.clone(), claimed);
        let task = task_factory();
        tokio::spawn(async move {
            let _guard = guard;
            task.await;
        });
        true
    }
}
