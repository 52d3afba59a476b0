//! Stale-while-revalidate read-through cache.
//!
//! [`SwrCache::run`] serves a fresh cached value when one exists and otherwise runs the
//! caller's query, caching the result when the cacheability predicate allows it.
//!
//! Storage is treated as unreliable: failed reads count as misses and failed writes or
//! deletes are dropped, so the cache never breaks the caller's data path. Only invalid
//! options and the query's own errors reach the caller.
//!
//! Concurrent misses for the same record are not coalesced. Each runs the query and the
//! last write wins.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::envelope;
use crate::predicate::should_cache;
use crate::query::QueryOptions;
use crate::store::{CacheDb, MemoryStore, RecordId, Store, storage_key};
use crate::Error;

/// Read-through cache over a single store namespace.
///
/// Clones share the underlying store.
#[derive(Clone)]
pub struct SwrCache {
    store: Arc<dyn Store>,
    debug_mode: bool,
}

impl SwrCache {
    /// Wrap `store`. With `debug_mode` on, hits, misses, writes, skips and swallowed
    /// storage failures are traced.
    pub fn new(store: impl Store + 'static, debug_mode: bool) -> Self {
        Self { store: Arc::new(store), debug_mode }
    }

    /// Cache persisted in `db` under `namespace`.
    pub fn open(db: &CacheDb, namespace: impl Into<String>, debug_mode: bool) -> Self {
        Self::new(db.store(namespace), debug_mode)
    }

    /// Cache held in process memory.
    pub fn in_memory(namespace: impl Into<String>, debug_mode: bool) -> Self {
        Self::new(MemoryStore::new(namespace), debug_mode)
    }

    pub fn namespace(&self) -> &str {
        self.store.namespace()
    }

    pub fn is_debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Run a query through the cache.
    ///
    /// Returns the cached data while it is fresh. Otherwise runs the query once,
    /// caches the result unless `cache_if` declines it, and returns the result.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidQueryFunction` / `Error::InvalidRevalidateValue` for invalid options
    /// - `Error::Query` carrying the query's own error
    pub async fn run<T>(&self, options: QueryOptions<T>) -> Result<T, Error>
    where
        T: Serialize + DeserializeOwned,
    {
        let options = options.normalize()?;
        let id = options.id.as_ref();

        if let Some(data) = self.get(id).await {
            if self.debug_mode {
                tracing::debug!(namespace = %self.namespace(), id = %storage_key(id), "cache hit");
            }
            return Ok(data);
        }

        if self.debug_mode {
            tracing::debug!(namespace = %self.namespace(), id = %storage_key(id), "cache miss");
        }

        let data = (options.query)().await.map_err(Error::Query)?;

        if should_cache(id, &data, options.cache_if.as_ref()).await {
            self.set(id, &data, options.revalidate).await;
        } else if self.debug_mode {
            tracing::debug!(namespace = %self.namespace(), id = %storage_key(id), "cache skip");
        }

        Ok(data)
    }

    /// Drop the cached record for `id`, or every record in the namespace when `id` is `None`.
    ///
    /// Never fails; storage errors are discarded.
    pub async fn revalidate(&self, id: Option<&RecordId>) {
        if let Err(e) = self.store.delete(id).await {
            if self.debug_mode {
                tracing::warn!(
                    namespace = %self.namespace(),
                    id = %storage_key(id),
                    error = %e,
                    "failed to revalidate cached record"
                );
            }
        }
    }

    /// Read and unwrap a record. Missing, stale, malformed and unreadable records are all `None`.
    async fn get<T: DeserializeOwned>(&self, id: Option<&RecordId>) -> Option<T> {
        let raw = match self.store.get(id).await {
            Ok(raw) => raw?,
            Err(e) => {
                if self.debug_mode {
                    tracing::warn!(
                        namespace = %self.namespace(),
                        id = %storage_key(id),
                        error = %e,
                        "failed to read cached record"
                    );
                }
                return None;
            }
        };

        let wrapped = envelope::decode(raw);
        if wrapped.is_none() && self.debug_mode {
            tracing::debug!(namespace = %self.namespace(), id = %storage_key(id), "ignoring malformed cached record");
        }
        envelope::unwrap(wrapped)
    }

    async fn set<T: Serialize>(&self, id: Option<&RecordId>, data: &T, revalidate_ms: u64) {
        let wrapped = envelope::wrap(data, revalidate_ms);
        let result = match serde_json::to_value(&wrapped) {
            Ok(value) => self.store.set(id, value).await,
            Err(e) => Err(Error::from(e)),
        };

        if !self.debug_mode {
            return;
        }
        match result {
            Ok(()) => tracing::debug!(
                namespace = %self.namespace(),
                id = %storage_key(id),
                stale_at = wrapped.stale_at,
                "cache set"
            ),
            Err(e) => tracing::warn!(
                namespace = %self.namespace(),
                id = %storage_key(id),
                error = %e,
                "failed to write cached record"
            ),
        }
    }
}

impl fmt::Debug for SwrCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwrCache")
            .field("namespace", &self.namespace())
            .field("debug_mode", &self.debug_mode)
            .finish()
    }
}
