//! Result ordering.
//!
//! Sorting happens in two steps. The store produces a *total order*: every
//! feature id that has a value for the sort key, ordered by that value. The
//! matched ids are then ranked by their first position in that order, and
//! ids the order never mentions follow in ascending id order.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, warn};

use super::bindings::{BindingTarget, QueryField};
use crate::core::{FeatureStore, StoreQuery};
use crate::types::enums::gate_state;
use crate::types::{Collection, FeatureId, Filter, Property, SortSpec};

/// What a sort spec orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// A query field.
    Field(QueryField),
    /// `gate.requested_on`: when review was requested on a pending gate.
    RequestedOn,
    /// `gate.reviewed_on`: when a gate reached a final decision.
    ReviewedOn,
}

impl SortKey {
    /// Recognizes a sort key; `None` for names that cannot be sorted on.
    ///
    /// Every query field is sortable, including the unindexed `name` and
    /// `summary`: the index only restricts filtering.
    pub fn parse(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "gate.requested_on" => Some(SortKey::RequestedOn),
            "gate.reviewed_on" => Some(SortKey::ReviewedOn),
            other => QueryField::parse(other).map(SortKey::Field),
        }
    }

    /// The ordered store query producing the total order.
    pub fn order_query(self, descending: bool) -> StoreQuery {
        match self {
            SortKey::RequestedOn => StoreQuery::new(Collection::Gate)
                .filter(Filter::one_of(
                    Property::GateState,
                    gate_state::PENDING_STATES.iter().copied(),
                ))
                .order_by(Property::RequestedOn, descending),
            SortKey::ReviewedOn => StoreQuery::new(Collection::Gate)
                .filter(Filter::one_of(
                    Property::GateState,
                    gate_state::FINAL_STATES.iter().copied(),
                ))
                .order_by(Property::ResolvedOn, descending),
            SortKey::Field(field) => {
                let binding = field.binding();
                match binding.target {
                    BindingTarget::Primary => StoreQuery::new(Collection::Feature)
                        .order_by(binding.property, descending),
                    BindingTarget::Joined { stage_types } => StoreQuery::new(Collection::Stage)
                        .filter(Filter::one_of(
                            Property::StageType,
                            stage_types.iter().copied(),
                        ))
                        .order_by(binding.property, descending),
                }
            }
        }
    }
}

/// Orders matched ids by a sort spec.
#[derive(Clone)]
pub struct Sorter {
    store: Arc<dyn FeatureStore>,
}

impl Sorter {
    /// Creates a sorter over `store`.
    pub fn new(store: Arc<dyn FeatureStore>) -> Self {
        Self { store }
    }

    /// Fetches the total order for `spec`.
    ///
    /// Returns an empty order, which sorts purely by id, for unknown keys
    /// and failed lookups.
    pub async fn total_order(&self, spec: &SortSpec) -> Vec<FeatureId> {
        let Some(key) = SortKey::parse(&spec.key) else {
            warn!(sort = %spec, "Unknown sort key, ordering by id");
            return Vec::new();
        };

        match self.store.fetch_ids(&key.order_query(spec.descending)).await {
            Ok(order) => {
                debug!(sort = %spec, ranked = order.len(), "Fetched sort order");
                order
            }
            Err(e) => {
                warn!(
                    sort = %spec,
                    backend = self.store.backend_name(),
                    error = %e,
                    "Sort lookup failed, ordering by id"
                );
                Vec::new()
            }
        }
    }

    /// Sorts `ids` by `spec`.
    pub async fn sort(&self, ids: &BTreeSet<FeatureId>, spec: &SortSpec) -> Vec<FeatureId> {
        let order = self.total_order(spec).await;
        reorder(ids, &order)
    }
}

/// Ranks `ids` by first position in `order`; unranked ids follow by id.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use radar_search::search::sorter::reorder;
///
/// let ids: BTreeSet<i64> = [1, 2, 3, 4].into_iter().collect();
/// assert_eq!(reorder(&ids, &[3, 9, 1, 3]), vec![3, 1, 2, 4]);
/// ```
pub fn reorder(ids: &BTreeSet<FeatureId>, order: &[FeatureId]) -> Vec<FeatureId> {
    let mut first_seen: HashMap<FeatureId, usize> = HashMap::with_capacity(order.len());
    for (position, id) in order.iter().enumerate() {
        first_seen.entry(*id).or_insert(position);
    }

    let mut ranked: Vec<(usize, FeatureId)> = ids
        .iter()
        .map(|id| (first_seen.get(id).copied().unwrap_or(usize::MAX), *id))
        .collect();
    ranked.sort_unstable();
    ranked.into_iter().map(|(_, id)| id).collect()
}
