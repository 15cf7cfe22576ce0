//! Collaborator implementations.
//!
//! | Backend | Description |
//! |---------|-------------|
//! | [`memory::MemoryStore`] | In-process record store with a word-bag text index |
//! | [`memory::MemoryCache`] | In-process result cache with a fixed entry lifetime |
//!
//! # Example
//!
//! ```
//! use radar_search::backends::memory::{MemoryCache, MemoryStore};
//! use std::time::Duration;
//!
//! let store = MemoryStore::new();
//! let cache = MemoryCache::new(Duration::from_secs(3600));
//! assert!(store.is_empty());
//! assert!(cache.is_empty());
//! ```

pub mod memory;
