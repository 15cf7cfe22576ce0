//! In-memory record store.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{FeatureStore, StoreQuery};
use crate::error::{StoreError, StoreResult};
use crate::types::{
    Collection, FeatureId, FeatureRecord, FieldValue, GateRecord, Record, StageRecord,
    StarRecord, StoreOrder,
};

/// The contents of a store, as loaded from a JSON fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryFixture {
    /// Feature entries.
    #[serde(default)]
    pub features: Vec<FeatureRecord>,
    /// Stages.
    #[serde(default)]
    pub stages: Vec<StageRecord>,
    /// Review gates.
    #[serde(default)]
    pub gates: Vec<GateRecord>,
    /// Stars.
    #[serde(default)]
    pub stars: Vec<StarRecord>,
}

#[derive(Default)]
struct Tables {
    features: Vec<FeatureRecord>,
    stages: Vec<StageRecord>,
    gates: Vec<GateRecord>,
    stars: Vec<StarRecord>,
    /// word -> features whose name or summary contains it
    text_index: BTreeMap<String, BTreeSet<FeatureId>>,
    unavailable: HashSet<Collection>,
}

/// In-memory [`FeatureStore`].
///
/// Filtering follows the usual document-store rules: a record without a
/// value for a filtered property never matches, and a list property matches
/// if any element does. Ordered lookups skip records that have no value for
/// the order property and break ties by insertion order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("MemoryStore")
            .field("features", &tables.features.len())
            .field("stages", &tables.stages.len())
            .field("gates", &tables.gates.len())
            .field("stars", &tables.stars.len())
            .finish_non_exhaustive()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the fixture's records.
    pub fn from_fixture(fixture: MemoryFixture) -> Self {
        let store = Self::new();
        for feature in fixture.features {
            store.insert_feature(feature);
        }
        for stage in fixture.stages {
            store.insert_stage(stage);
        }
        for gate in fixture.gates {
            store.insert_gate(gate);
        }
        for star in fixture.stars {
            store.insert_star(star);
        }
        store
    }

    /// Parses a JSON fixture and loads it.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        let fixture: MemoryFixture =
            serde_json::from_str(json).map_err(|e| StoreError::Internal {
                backend_name: "memory".to_string(),
                message: "invalid fixture".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self::from_fixture(fixture))
    }

    /// Inserts a feature, replacing any feature with the same id.
    pub fn insert_feature(&self, feature: FeatureRecord) {
        let mut tables = self.tables.write();
        let id = feature.id;

        tables.text_index.retain(|_, ids| {
            ids.remove(&id);
            !ids.is_empty()
        });
        for word in index_words(&feature.name).chain(index_words(&feature.summary)) {
            tables.text_index.entry(word).or_default().insert(id);
        }

        match tables.features.iter_mut().find(|f| f.id == id) {
            Some(existing) => *existing = feature,
            None => tables.features.push(feature),
        }
    }

    /// Inserts a stage.
    pub fn insert_stage(&self, stage: StageRecord) {
        self.tables.write().stages.push(stage);
    }

    /// Inserts a gate.
    pub fn insert_gate(&self, gate: GateRecord) {
        self.tables.write().gates.push(gate);
    }

    /// Inserts a star.
    pub fn insert_star(&self, star: StarRecord) {
        self.tables.write().stars.push(star);
    }

    /// Makes every lookup against `collection` fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, collection: Collection, unavailable: bool) {
        let mut tables = self.tables.write();
        if unavailable {
            tables.unavailable.insert(collection);
        } else {
            tables.unavailable.remove(&collection);
        }
    }

    /// Number of feature entries.
    pub fn len(&self) -> usize {
        self.tables.read().features.len()
    }

    /// Returns `true` if the store holds no features.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self, collection: Collection) -> StoreResult<()> {
        if self.tables.read().unavailable.contains(&collection) {
            return Err(StoreError::Unavailable {
                backend_name: self.backend_name().to_string(),
                message: format!("{} collection is offline", collection),
            });
        }
        Ok(())
    }
}

/// Splits text into lowercase alphanumeric words.
fn index_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// The value a record is ordered by: the smallest for ascending order, the
/// largest for descending order.
fn order_key<R: Record>(record: &R, order: StoreOrder) -> Option<FieldValue> {
    record.values(order.property).into_iter().reduce(|a, b| {
        let b_first = match a.compare(&b) {
            Some(Ordering::Greater) => !order.descending,
            Some(Ordering::Less) => order.descending,
            _ => false,
        };
        if b_first { b } else { a }
    })
}

fn select<R: Record>(records: &[R], query: &StoreQuery) -> Vec<FeatureId> {
    let matched = records.iter().filter(|record| {
        query
            .filters
            .iter()
            .all(|filter| filter.matches(&record.values(filter.property)))
    });

    let Some(order) = query.order else {
        return matched.map(|record| record.feature_id()).collect();
    };

    let mut keyed: Vec<(FieldValue, FeatureId)> = matched
        .filter_map(|record| order_key(record, order).map(|key| (key, record.feature_id())))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = a.compare(b).unwrap_or(Ordering::Equal);
        if order.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    keyed.into_iter().map(|(_, id)| id).collect()
}

#[async_trait]
impl FeatureStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn fetch_ids(&self, query: &StoreQuery) -> StoreResult<Vec<FeatureId>> {
        query.validate()?;
        self.check_available(query.collection)?;

        let tables = self.tables.read();
        let ids = match query.collection {
            Collection::Feature => select(&tables.features, query),
            Collection::Stage => select(&tables.stages, query),
            Collection::Gate => select(&tables.gates, query),
            Collection::Star => select(&tables.stars, query),
        };

        debug!(
            collection = %query.collection,
            filters = query.filters.len(),
            matched = ids.len(),
            "Memory store lookup"
        );
        Ok(ids)
    }

    async fn fetch_features(&self, ids: &[FeatureId]) -> StoreResult<Vec<FeatureRecord>> {
        self.check_available(Collection::Feature)?;

        let wanted: HashSet<FeatureId> = ids.iter().copied().collect();
        let tables = self.tables.read();
        Ok(tables
            .features
            .iter()
            .filter(|f| wanted.contains(&f.id))
            .cloned()
            .collect())
    }

    async fn search_text(&self, text: &str) -> StoreResult<Vec<FeatureId>> {
        self.check_available(Collection::Feature)?;

        let words: Vec<String> = index_words(text).collect();
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let tables = self.tables.read();
        let mut postings = words.iter().map(|w| tables.text_index.get(w));
        let Some(Some(first)) = postings.next() else {
            return Ok(Vec::new());
        };

        let mut hits = first.clone();
        for posting in postings {
            match posting {
                Some(ids) => hits.retain(|id| ids.contains(id)),
                None => return Ok(Vec::new()),
            }
        }
        Ok(hits.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::types::enums::stage_type;
    use crate::types::{Filter, Operator, Property};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn create_store() -> MemoryStore {
        let store = MemoryStore::new();

        let mut grid = FeatureRecord::new(1, "CSS Grid", day(3));
        grid.summary = "Two-dimensional layout".to_string();
        grid.owner_emails = vec!["a@example.com".to_string()];
        store.insert_feature(grid);

        let mut flex = FeatureRecord::new(2, "Flexbox gap", day(1));
        flex.summary = "Gap property for flex layout".to_string();
        store.insert_feature(flex);

        let mut stage = StageRecord::new(10, 2, stage_type::SHIPPING);
        stage.desktop_first = Some(84);
        store.insert_stage(stage);
        let mut stage = StageRecord::new(11, 2, stage_type::FF_SHIPPING);
        stage.desktop_first = Some(90);
        store.insert_stage(stage);
        let mut stage = StageRecord::new(12, 1, stage_type::SHIPPING);
        stage.desktop_first = Some(57);
        store.insert_stage(stage);

        store
    }

    // ============================================================================
    // Lookup Tests
    // ============================================================================

    #[tokio::test]
    async fn test_fetch_ids_filters_features() {
        let store = create_store();
        let query = StoreQuery::new(Collection::Feature)
            .filter(Filter::eq(Property::OwnerEmails, "a@example.com"));
        assert_eq!(store.fetch_ids(&query).await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_fetch_ids_projects_stage_duplicates() {
        let store = create_store();
        let query = StoreQuery::new(Collection::Stage)
            .filter(Filter::compare(Property::DesktopFirst, Operator::Ge, 80));
        assert_eq!(store.fetch_ids(&query).await.unwrap(), vec![2, 2]);
    }

    #[tokio::test]
    async fn test_fetch_ids_ordered() {
        let store = create_store();

        let query = StoreQuery::new(Collection::Feature).order_by(Property::Created, true);
        assert_eq!(store.fetch_ids(&query).await.unwrap(), vec![1, 2]);

        let query = StoreQuery::new(Collection::Stage).order_by(Property::DesktopFirst, false);
        assert_eq!(store.fetch_ids(&query).await.unwrap(), vec![1, 2, 2]);
    }

    #[tokio::test]
    async fn test_ordered_lookup_skips_missing_values() {
        let store = create_store();
        let query = StoreQuery::new(Collection::Feature).order_by(Property::AccurateAsOf, false);
        assert!(store.fetch_ids(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_ids_rejects_mixed_collections() {
        let store = create_store();
        let query = StoreQuery::new(Collection::Feature)
            .filter(Filter::eq(Property::StageType, stage_type::SHIPPING));
        assert!(matches!(
            store.fetch_ids(&query).await,
            Err(StoreError::PropertyMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_unavailable_collection() {
        let store = create_store();
        store.set_unavailable(Collection::Stage, true);

        let query = StoreQuery::new(Collection::Stage);
        assert!(matches!(
            store.fetch_ids(&query).await,
            Err(StoreError::Unavailable { .. })
        ));

        store.set_unavailable(Collection::Stage, false);
        assert_eq!(store.fetch_ids(&query).await.unwrap().len(), 3);
    }

    // ============================================================================
    // Text Index Tests
    // ============================================================================

    #[tokio::test]
    async fn test_search_text_requires_every_word() {
        let store = create_store();
        assert_eq!(store.search_text("layout").await.unwrap(), vec![1, 2]);
        assert_eq!(store.search_text("flex LAYOUT").await.unwrap(), vec![2]);
        assert!(store.search_text("layout nothing").await.unwrap().is_empty());
        assert!(store.search_text("  ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reinsert_updates_text_index() {
        let store = create_store();
        store.insert_feature(FeatureRecord::new(1, "Subgrid", day(3)));

        assert_eq!(store.len(), 2);
        assert!(store.search_text("grid").await.unwrap().is_empty());
        assert_eq!(store.search_text("subgrid").await.unwrap(), vec![1]);
    }

    // ============================================================================
    // Fixture Tests
    // ============================================================================

    #[tokio::test]
    async fn test_from_json() {
        let json = r#"{
            "features": [
                {"id": 5, "name": "View transitions",
                 "created": "2024-01-04T00:00:00Z", "updated": "2024-01-04T00:00:00Z"}
            ],
            "stars": [{"email": "a@example.com", "feature_id": 5}]
        }"#;
        let store = MemoryStore::from_json(json).unwrap();
        let features = store.fetch_features(&[5, 6]).await.unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "View transitions");
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            MemoryStore::from_json("{not json"),
            Err(StoreError::Internal { .. })
        ));
    }
}
