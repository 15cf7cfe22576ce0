//! Radar feature query engine.
//!
//! This crate answers structured search queries over feature entries, such
//! as `category=Security -owner:me created.when>now-30d OR starred-by:me`,
//! returning a sorted, visibility-filtered page of results.
//!
//! # Architecture
//!
//! - [`types`] - records, typed filters, parsed queries and result pages
//! - [`error`] - error types
//! - [`config`] - pipeline configuration
//! - [`caller`] - the caller's identity, query context and permissions
//! - [`core`] - collaborator traits (record store, result cache)
//! - [`search`] - the pipeline stages and [`FeatureSearch`]
//! - [`backends`] - in-memory collaborator implementations
//!
//! # Query language
//!
//! A query is a sequence of terms. Terms are AND-ed; a term prefixed with
//! `OR ` starts a new clause, and clauses are OR-ed. A `-` prefix negates a
//! term. Field terms compare a field with a value (`=`, `!=`, `<`, `<=`,
//! `>`, `>=`, or `:` for equality); anything else is full-text search.
//! Values can be quoted, comma lists (`category=CSS,DOM`) or ranges
//! (`created.when=2024-01-01..2024-06-30`), and understand relative literals
//! such as `now-7d` and `current_stable+1`.
//!
//! Malformed fragments and unknown fields never fail a query; they are
//! logged and match nothing.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use chrono::{TimeZone, Utc};
//! use radar_search::backends::memory::MemoryStore;
//! use radar_search::types::enums::category;
//! use radar_search::types::FeatureRecord;
//! use radar_search::{FeatureSearch, QueryContext, SearchRequest, StaticPermissions};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), radar_search::SearchError> {
//! let store = MemoryStore::new();
//! let created = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap();
//! let mut feature = FeatureRecord::new(1, "Trusted Types", created);
//! feature.category = category::SECURITY;
//! store.insert_feature(feature);
//!
//! let search = FeatureSearch::new(Arc::new(store), Arc::new(StaticPermissions::new()));
//! let ctx = QueryContext::new(Utc::now(), 124);
//!
//! let page = search
//!     .process_query(&SearchRequest::new("category=Security"), &ctx)
//!     .await?;
//! assert_eq!(page.ids(), vec![1]);
//! assert_eq!(page.total_count, 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod caller;
pub mod config;
pub mod core;
pub mod error;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use caller::{Identity, PermissionProvider, QueryContext, StaticPermissions};
pub use config::SearchConfig;
pub use error::{CacheError, SearchError, SearchResult, StoreError};
pub use search::{FeatureSearch, SearchRequest};
pub use types::{Pagination, SearchPage, SortSpec, VisibilityFlags};

// Re-export collaborator traits
pub use core::{FeatureStore, ResultCache, StoreQuery};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
