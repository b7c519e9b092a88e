//! Two-tier read-through engine

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use catalog_cache_core::{
    CacheEntry, CacheMetrics, CacheOperation, CacheRead, CacheStats, CacheTier, Clock,
    EvictionReason, FreshnessPolicy, Result,
};
use catalog_cache_storage::{MemoryTier, PersistentTier};

mod coalescer;
use coalescer::Coalescer;

/// State shared by every tiered cache of one facade
pub(crate) struct TierContext<M> {
    pub persistent: PersistentTier,
    pub policy: FreshnessPolicy,
    pub clock: Arc<dyn Clock>,
    pub metrics: Arc<M>,
    pub stats: Arc<RwLock<CacheStats>>,
    /// Bumped by every invalidation; fetches started under an older
    /// generation never write their result
    pub generation: Arc<AtomicU64>,
    pub coalesce: bool,
}

impl<M> Clone for TierContext<M> {
    fn clone(&self) -> Self {
        Self {
            persistent: self.persistent.clone(),
            policy: self.policy,
            clock: self.clock.clone(),
            metrics: self.metrics.clone(),
            stats: self.stats.clone(),
            generation: self.generation.clone(),
            coalesce: self.coalesce,
        }
    }
}

/// Read-through cache over a memory tier and a persistent tier for values
/// of type `V`
///
/// Cloning creates a new handle to the SAME tiers.
pub(crate) struct TieredCache<V, M> {
    memory: MemoryTier<V>,
    coalescer: Coalescer<V>,
    ctx: TierContext<M>,
}

impl<V, M> Clone for TieredCache<V, M> {
    fn clone(&self) -> Self {
        Self {
            memory: self.memory.clone(),
            coalescer: self.coalescer.clone(),
            ctx: self.ctx.clone(),
        }
    }
}

impl<V, M> TieredCache<V, M>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    M: CacheMetrics,
{
    pub fn new(ctx: TierContext<M>) -> Self {
        Self {
            memory: MemoryTier::new(),
            coalescer: Coalescer::new(),
            ctx,
        }
    }

    /// Serve `key` from the tiers, falling back to `fetch`
    ///
    /// 1. fresh memory entry: returned as is
    /// 2. usable persisted entry: promoted to memory, returned, and a
    ///    background refresh is spawned
    /// 3. otherwise: `fetch` is awaited and its result written to both tiers
    ///
    /// Only branch 3 can fail; on failure no tier is written.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<CacheRead<V>>
    where
        F: Fn() -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let start = Instant::now();
        let now = self.ctx.clock.now_ms();

        if let Some(entry) = self.memory.get(key) {
            if self.ctx.policy.is_valid(Some(&entry), now) {
                self.ctx.stats.write().memory_hits += 1;
                self.ctx.metrics.record_hit(key, CacheTier::Memory);
                self.ctx
                    .metrics
                    .record_latency(CacheOperation::Get, start.elapsed());
                return Ok(CacheRead::cached(entry.into_data()));
            }
        }

        let persisted = self.ctx.policy.lookup(self.ctx.persistent.read::<V>(key), now);
        let stale = persisted.is_stale();
        if let Some(entry) = persisted.entry() {
            trace!(target: "catalog_cache", key = %key, stale, "promoting persisted entry");
            {
                let mut stats = self.ctx.stats.write();
                stats.persistent_hits += 1;
                if stale {
                    stats.stale_hits += 1;
                }
            }
            if stale {
                self.ctx.metrics.record_stale_hit(key);
            } else {
                self.ctx.metrics.record_hit(key, CacheTier::Persistent);
            }

            self.memory.insert(key, entry.clone());
            self.spawn_refresh(key, fetch);
            self.ctx
                .metrics
                .record_latency(CacheOperation::Get, start.elapsed());
            return Ok(CacheRead::cached(entry.into_data()));
        }

        self.ctx.stats.write().misses += 1;
        self.ctx.metrics.record_miss(key);

        let value = if self.ctx.coalesce {
            let this = self.clone();
            let owned = key.to_string();
            self.coalescer
                .do_request(key, move || this.fetch_and_store(owned, fetch))
                .await?
        } else {
            self.clone().fetch_and_store(key.to_string(), fetch).await?
        };

        self.ctx
            .metrics
            .record_latency(CacheOperation::Get, start.elapsed());
        Ok(CacheRead::fetched(value))
    }

    /// Run `fetch` and write its result through to both tiers
    async fn fetch_and_store<F, Fut>(self, key: String, fetch: F) -> Result<V>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let generation = self.ctx.generation.load(Ordering::SeqCst);
        self.ctx.stats.write().fetches += 1;

        let start = Instant::now();
        let result = fetch().await;
        self.ctx
            .metrics
            .record_latency(CacheOperation::Fetch, start.elapsed());

        match result {
            Ok(value) => {
                if self.ctx.generation.load(Ordering::SeqCst) != generation {
                    debug!(target: "catalog_cache", key = %key, "cache invalidated during fetch, result not stored");
                    return Ok(value);
                }

                self.store(&key, value.clone());

                // an invalidation that landed between the check and the writes wins
                if self.ctx.generation.load(Ordering::SeqCst) != generation {
                    self.memory.remove(&key);
                    self.ctx.persistent.remove(&key);
                    debug!(target: "catalog_cache", key = %key, "cache invalidated while storing, entry rolled back");
                }
                Ok(value)
            }
            Err(e) => {
                self.ctx.stats.write().fetch_failures += 1;
                Err(e)
            }
        }
    }

    /// Write a new entry to both tiers; each write is independent
    fn store(&self, key: &str, value: V) {
        let entry = CacheEntry::new(value, self.ctx.clock.now_ms());

        let start = Instant::now();
        if !self.ctx.persistent.write(key, &entry) {
            self.ctx.stats.write().persist_failures += 1;
        }
        self.ctx
            .metrics
            .record_latency(CacheOperation::Persist, start.elapsed());

        if self.memory.contains(key) {
            self.ctx.metrics.record_eviction(EvictionReason::Replaced, 1);
        }
        self.memory.insert(key, entry);
    }

    /// Refresh `key` in a detached task; the caller never waits on it
    fn spawn_refresh<F, Fut>(&self, key: &str, fetch: F)
    where
        F: Fn() -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let this = self.clone();
        let owned = key.to_string();
        let spawned = self
            .coalescer
            .spawn_refresh(key, self.ctx.coalesce, move || async move {
                let metrics = this.ctx.metrics.clone();
                let start = Instant::now();
                match this.fetch_and_store(owned.clone(), fetch).await {
                    Ok(_) => {
                        debug!(target: "catalog_cache", key = %owned, "background refresh completed")
                    }
                    Err(e) => {
                        debug!(target: "catalog_cache", key = %owned, error = %e, "background refresh failed")
                    }
                }
                metrics.record_latency(CacheOperation::Refresh, start.elapsed());
            });

        if spawned {
            self.ctx.stats.write().refreshes += 1;
        }
    }

    /// Drop every memory entry; returns how many there were
    pub fn clear_memory(&self) -> usize {
        self.memory.clear()
    }

    /// Number of memory entries
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Whether the memory tier holds `key`
    pub fn contains(&self, key: &str) -> bool {
        self.memory.contains(key)
    }

    /// Background refreshes still running
    pub fn pending_refreshes(&self) -> usize {
        self.coalescer.pending_refreshes()
    }
}
