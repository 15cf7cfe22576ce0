//! In-memory result cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::time::Instant;

use crate::core::ResultCache;
use crate::error::CacheResult;
use crate::types::SearchPage;

/// In-memory [`ResultCache`] whose entries expire after a fixed lifetime.
///
/// Expiry uses the tokio clock, so tests running with a paused runtime can
/// advance past it.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, (Instant, SearchPage)>>>,
    ttl: Duration,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `key` holds a fresh entry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .read()
            .get(key)
            .is_some_and(|(stored_at, _)| stored_at.elapsed() < self.ttl)
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> CacheResult<Option<SearchPage>> {
        let mut entries = self.entries.write();
        match entries.get(key) {
            Some((stored_at, page)) if stored_at.elapsed() < self.ttl => Ok(Some(page.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, page: SearchPage) -> CacheResult<()> {
        self.entries
            .write()
            .insert(key.to_string(), (Instant::now(), page));
        Ok(())
    }
}
