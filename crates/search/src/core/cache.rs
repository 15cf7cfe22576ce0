//! Result cache collaborator.

use async_trait::async_trait;

use crate::error::CacheResult;
use crate::types::SearchPage;

/// A shared key-value cache of finished result pages.
///
/// Writes are idempotent: the same key is only ever written with the page
/// computed for it. Expiry is the implementation's concern.
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Returns a human-readable name for this cache backend.
    fn backend_name(&self) -> &'static str;

    /// Returns the cached page for `key`, if present and fresh.
    async fn get(&self, key: &str) -> CacheResult<Option<SearchPage>>;

    /// Stores a page under `key`.
    async fn set(&self, key: &str, page: SearchPage) -> CacheResult<()>;
}
