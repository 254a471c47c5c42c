//! # Store Connector
//!
//! Builds record store clients from connection parameters and keeps one
//! client per `(url, key)` pair for the lifetime of the process.
//!
//! ## Cache Behaviour
//! ```text
//! connect("https://a", "k1") ──► miss ──► factory() ──► cache["https://a:k1"]
//! connect("https://a", "k1") ──► hit  ──────────────────► same Arc
//! connect("https://a", "k2") ──► miss ──► factory() ──► cache["https://a:k2"]
//! ```
//! Entries are never evicted. A factory error is returned and nothing is
//! cached, so the next call tries again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use crate::error::StoreResult;
use crate::record::RecordStore;
use crate::rest::RestStore;

/// Produces record store clients.
pub trait StoreConnector: Send + Sync {
    /// Returns a client for the store at `url` using `api_key`.
    fn connect(&self, url: &str, api_key: &str) -> StoreResult<Arc<dyn RecordStore>>;
}

type Factory = dyn Fn(&str, &str) -> StoreResult<Arc<dyn RecordStore>> + Send + Sync;

/// Connector with an append-only client cache.
pub struct CachedConnector {
    factory: Box<Factory>,
    cache: Mutex<HashMap<String, Arc<dyn RecordStore>>>,
}

impl CachedConnector {
    /// Connector producing [`RestStore`] clients with the given request timeout.
    pub fn rest(timeout: Duration) -> Self {
        Self::with_factory(move |url, key| {
            let store: Arc<dyn RecordStore> = Arc::new(RestStore::new(url, key, timeout)?);
            Ok(store)
        })
    }

    /// Connector using a custom factory.
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: Fn(&str, &str) -> StoreResult<Arc<dyn RecordStore>> + Send + Sync + 'static,
    {
        CachedConnector {
            factory: Box::new(factory),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Connector that always hands out `store`.
    pub fn fixed(store: Arc<dyn RecordStore>) -> Self {
        Self::with_factory(move |_, _| Ok(Arc::clone(&store)))
    }

    /// Number of cached clients.
    pub fn cached_count(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn cache_key(url: &str, api_key: &str) -> String {
        format!("{}:{}", url.trim().trim_end_matches('/'), api_key.trim())
    }
}

impl StoreConnector for CachedConnector {
    fn connect(&self, url: &str, api_key: &str) -> StoreResult<Arc<dyn RecordStore>> {
        let key = Self::cache_key(url, api_key);

        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(store) = cache.get(&key) {
            return Ok(Arc::clone(store));
        }

        let store = (self.factory)(url, api_key)?;
        cache.insert(key, Arc::clone(&store));
        debug!(url, cached = cache.len(), "Record store client created");
        Ok(store)
    }
}
