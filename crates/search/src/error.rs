//! Error types for the feature query engine.
//!
//! Only structurally invalid request parameters surface to callers as a
//! [`SearchError`]. Failures of individual lookups ([`StoreError`]) and of the
//! result cache ([`CacheError`]) are recovered inside the pipeline and logged.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The error type returned by the query pipeline.
#[derive(Error, Debug)]
pub enum SearchError {
    /// A pagination parameter was negative or not an integer.
    #[error("invalid pagination parameter {parameter}={value}: {message}")]
    InvalidPagination {
        parameter: String,
        value: String,
        message: String,
    },

    /// A store failure that could not be recovered (fetching the final records).
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors reported by a [`FeatureStore`](crate::core::FeatureStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend is currently unavailable.
    #[error("store unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// The lookup did not finish within the store's deadline.
    #[error("store lookup timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The query used a property the collection does not carry.
    #[error("property {property} does not belong to collection {collection}")]
    PropertyMismatch {
        property: String,
        collection: String,
    },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Errors reported by a [`ResultCache`](crate::core::ResultCache).
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache could not be reached.
    #[error("cache unavailable: {message}")]
    Unavailable { message: String },

    /// A cached payload could not be encoded or decoded.
    #[error("cache serialization error: {message}")]
    Serialization { message: String },
}

/// Result type alias for pipeline operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization {
            message: err.to_string(),
        }
    }
}
