//! Record store collaborator.
//!
//! This module defines the [`FeatureStore`] trait, the engine's only view of
//! persisted records, and [`StoreQuery`], the single-collection lookup it
//! accepts.

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::types::{Collection, FeatureId, FeatureRecord, Filter, Property, StoreOrder};

/// A lookup against one collection.
///
/// All filters apply to the same collection and are combined with AND. The
/// result is the owning feature id of every matching record, in store order
/// or in the requested property order. Duplicates are preserved: a feature
/// with two matching stages appears twice.
///
/// # Examples
///
/// ```
/// use radar_search::core::StoreQuery;
/// use radar_search::types::{Collection, Filter, Operator, Property};
/// use radar_search::types::enums::stage_type;
///
/// let query = StoreQuery::new(Collection::Stage)
///     .filter(Filter::one_of(Property::StageType, stage_type::SHIPPING_STAGES.iter().copied()))
///     .filter(Filter::compare(Property::DesktopFirst, Operator::Ge, 120))
///     .order_by(Property::DesktopFirst, false);
/// assert!(query.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StoreQuery {
    /// The collection searched.
    pub collection: Collection,
    /// Conjunctive filters.
    pub filters: Vec<Filter>,
    /// Optional ordering; records without a value for the property are omitted.
    pub order: Option<StoreOrder>,
}

impl StoreQuery {
    /// Creates an unfiltered lookup over a collection.
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order: None,
        }
    }

    /// Adds a filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Orders the result by a property.
    pub fn order_by(mut self, property: Property, descending: bool) -> Self {
        self.order = Some(StoreOrder {
            property,
            descending,
        });
        self
    }

    /// Checks that every filter and the ordering use this collection.
    pub fn validate(&self) -> StoreResult<()> {
        let properties = self
            .filters
            .iter()
            .map(|f| f.property)
            .chain(self.order.map(|o| o.property));

        for property in properties {
            if property.collection() != self.collection {
                return Err(StoreError::PropertyMismatch {
                    property: property.to_string(),
                    collection: self.collection.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Read access to feature records and the collections joined to them.
///
/// Implementations must be safe to call concurrently; the engine issues one
/// lookup per query term, all in flight at once.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// Returns a human-readable name for this store backend.
    fn backend_name(&self) -> &'static str;

    /// Runs a single-collection lookup and projects matches to feature ids.
    ///
    /// # Errors
    ///
    /// * `StoreError::PropertyMismatch` - if the query mixes collections
    /// * `StoreError::Unavailable` / `StoreError::Timeout` - backend failures
    async fn fetch_ids(&self, query: &StoreQuery) -> StoreResult<Vec<FeatureId>>;

    /// Loads feature records by id.
    ///
    /// Unknown ids are skipped. The result order is unspecified.
    async fn fetch_features(&self, ids: &[FeatureId]) -> StoreResult<Vec<FeatureRecord>>;

    /// Returns the ids of features whose indexed text contains every word of `text`.
    async fn search_text(&self, text: &str) -> StoreResult<Vec<FeatureId>>;
}
