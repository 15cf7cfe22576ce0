//! The query pipeline stages.
//!
//! | Stage | Module |
//! |-------|--------|
//! | Split query text into terms | [`tokenizer`] |
//! | Turn raw values into typed values | [`coercer`] |
//! | Map field names to store properties | [`bindings`] |
//! | Resolve field and text terms | [`resolver`] |
//! | Resolve `owner:me` and friends | [`identity`] |
//! | AND within clauses, OR across clauses | [`combinator`] |
//! | Order results | [`sorter`] |
//! | Hide records and paginate | [`visibility`] |
//! | Decide whether and under which key to cache | [`cache_gate`] |
//! | Run all of the above | [`engine`] |

pub mod bindings;
pub mod cache_gate;
pub mod coercer;
pub mod combinator;
pub mod engine;
pub mod identity;
pub mod resolver;
pub mod sorter;
pub mod tokenizer;
pub mod visibility;

pub use bindings::{BindingTarget, FieldBinding, QueryField};
pub use cache_gate::{is_cacheable, make_cache_key, normalize_query};
pub use combinator::{Universe, combine, join_all};
pub use engine::{FeatureSearch, SearchRequest};
pub use identity::{IdentityField, IdentityResolver};
pub use resolver::{Deferred, FieldResolver, LookupFuture, LookupPlan, Resolved};
pub use sorter::{SortKey, Sorter, reorder};
pub use tokenizer::{Terms, tokenize};
pub use visibility::VisibilityFilter;
