//! Collaborator traits.
//!
//! - [`FeatureStore`] - filtered, ordered lookups over the record collections
//! - [`ResultCache`] - shared cache of finished result pages
//!
//! The permission collaborator lives in [`crate::caller`].

mod cache;
mod store;

pub use cache::ResultCache;
pub use store::{FeatureStore, StoreQuery};
