//! Feature fixtures and search harness helpers.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use radar_search::backends::memory::MemoryStore;
use radar_search::types::enums::feature_type;
use radar_search::types::{FeatureId, FeatureRecord, GateRecord, StageRecord};
use radar_search::{
    FeatureSearch, Identity, QueryContext, SearchPage, SearchRequest, StaticPermissions,
};

/// Midnight UTC on the given day.
pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

/// The instant every test query runs at.
pub fn test_now() -> DateTime<Utc> {
    date(2024, 6, 1)
}

/// The current stable milestone every test query runs with.
pub const CURRENT_STABLE: i64 = 124;

/// An anonymous context at [`test_now`].
pub fn anonymous_context() -> QueryContext {
    QueryContext::new(test_now(), CURRENT_STABLE)
}

/// A signed-in context at [`test_now`].
pub fn user_context(email: &str) -> QueryContext {
    anonymous_context().with_caller(Identity::new(email))
}

/// Builder for feature records.
#[derive(Debug, Clone)]
pub struct FeatureFixture {
    record: FeatureRecord,
}

impl FeatureFixture {
    /// A listed, non-deleted feature created on 2024-01-01.
    pub fn new(id: FeatureId, name: &str) -> Self {
        Self {
            record: FeatureRecord::new(id, name, date(2024, 1, 1)),
        }
    }

    pub fn with_category(mut self, category: i64) -> Self {
        self.record.category = category;
        self
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.record.summary = summary.to_string();
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.record.created = created;
        self.record.updated = created;
        self
    }

    pub fn with_star_count(mut self, star_count: i64) -> Self {
        self.record.star_count = star_count;
        self
    }

    pub fn with_shipping_year(mut self, year: i64) -> Self {
        self.record.shipping_year = Some(year);
        self
    }

    pub fn with_owner(mut self, email: &str) -> Self {
        self.record.owner_emails.push(email.to_string());
        self
    }

    pub fn with_editor(mut self, email: &str) -> Self {
        self.record.editor_emails.push(email.to_string());
        self
    }

    pub fn with_creator(mut self, email: &str) -> Self {
        self.record.creator_email = Some(email.to_string());
        self
    }

    pub fn deleted(mut self) -> Self {
        self.record.deleted = true;
        self
    }

    pub fn unlisted(mut self) -> Self {
        self.record.unlisted = true;
        self
    }

    pub fn enterprise(mut self) -> Self {
        self.record.feature_type = feature_type::ENTERPRISE;
        self
    }

    pub fn build(self) -> FeatureRecord {
        self.record
    }
}

/// A shipping-style stage with a desktop milestone.
pub fn stage(id: i64, feature_id: FeatureId, stage_type: i64, desktop_first: i64) -> StageRecord {
    let mut stage = StageRecord::new(id, feature_id, stage_type);
    stage.desktop_first = Some(desktop_first);
    stage
}

/// A review gate.
pub fn gate(
    id: i64,
    feature_id: FeatureId,
    gate_type: i64,
    state: i64,
    requested_on: Option<DateTime<Utc>>,
    resolved_on: Option<DateTime<Utc>>,
) -> GateRecord {
    GateRecord {
        id,
        feature_id,
        stage_id: 0,
        gate_type,
        state,
        requested_on,
        resolved_on,
    }
}

/// A store holding `features`.
pub fn create_store(features: impl IntoIterator<Item = FeatureFixture>) -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    for feature in features {
        store.insert_feature(feature.build());
    }
    Arc::new(store)
}

/// A search over `store` that grants no permissions.
pub fn create_search(store: Arc<MemoryStore>) -> FeatureSearch {
    FeatureSearch::new(store, Arc::new(StaticPermissions::new()))
}

/// Runs an anonymous query with default options.
pub async fn run_query(search: &FeatureSearch, query: &str) -> SearchPage {
    search
        .process_query(&SearchRequest::new(query), &anonymous_context())
        .await
        .expect("query should succeed")
}

/// Sorted ids of a page, for set comparisons.
pub fn sorted_ids(page: &SearchPage) -> Vec<FeatureId> {
    let mut ids = page.ids();
    ids.sort_unstable();
    ids
}
