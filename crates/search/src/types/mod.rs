//! Core types for the query engine.
//!
//! - [`FeatureRecord`], [`StageRecord`], [`GateRecord`], [`StarRecord`] - stored records
//! - [`Property`], [`Filter`], [`Operator`] - typed store filters
//! - [`FieldValue`], [`ParsedValue`] - stored and coerced values
//! - [`Term`], [`Clause`], [`Query`], [`SortSpec`] - parsed query structure
//! - [`Pagination`], [`VisibilityFlags`], [`SearchPage`] - request window and output
//!
//! # Examples
//!
//! ```
//! use radar_search::types::{Operator, Query, SortSpec, Term};
//!
//! let query = Query::from_terms(vec![
//!     Term::field("category", Operator::Eq, "Security"),
//!     Term::field("category", Operator::Eq, "DOM").or(),
//! ]);
//! assert_eq!(query.clauses.len(), 2);
//!
//! let sort = SortSpec::parse("-created.when");
//! assert!(sort.descending);
//! ```

pub mod enums;
mod pagination;
mod property;
mod query;
mod records;
mod value;

pub use enums::{EnumKind, normalize_enum_name};
pub use pagination::{FeatureProjection, FeatureSummary, Pagination, SearchPage, VisibilityFlags};
pub use property::{
    Cardinality, Collection, Condition, Filter, Operator, Property, StoreOrder, ValueKind,
};
pub use query::{Clause, Query, SortSpec, Term, TermKind};
pub use records::{FeatureId, FeatureRecord, GateRecord, Record, StageRecord, StarRecord};
pub use value::{FieldValue, ParsedValue};
