//! Visibility filtering, pagination and projection of sorted results.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::caller::{PermissionProvider, QueryContext};
use crate::core::FeatureStore;
use crate::error::SearchResult;
use crate::types::{
    FeatureId, FeatureProjection, FeatureRecord, Pagination, SearchPage, VisibilityFlags,
};

/// Turns a sorted id list into a [`SearchPage`].
#[derive(Clone)]
pub struct VisibilityFilter {
    store: Arc<dyn FeatureStore>,
    permissions: Arc<dyn PermissionProvider>,
}

impl VisibilityFilter {
    /// Creates a filter.
    pub fn new(store: Arc<dyn FeatureStore>, permissions: Arc<dyn PermissionProvider>) -> Self {
        Self { store, permissions }
    }

    /// Loads the records for `sorted`, drops hidden ones, counts what is
    /// left and returns the requested window.
    ///
    /// Ids without a stored record are skipped. `total_count` is taken
    /// before pagination, so `num = 0` still reports every visible match.
    pub async fn apply(
        &self,
        sorted: &[FeatureId],
        flags: VisibilityFlags,
        pagination: Pagination,
        names_only: bool,
        ctx: &QueryContext,
    ) -> SearchResult<SearchPage> {
        let records = self.store.fetch_features(sorted).await?;
        let mut by_id: HashMap<FeatureId, FeatureRecord> =
            records.into_iter().map(|r| (r.id, r)).collect();

        let show_unlisted = flags.show_unlisted || self.caller_sees_unlisted(ctx).await;

        let visible: Vec<FeatureRecord> = sorted
            .iter()
            .filter_map(|id| by_id.remove(id))
            .filter(|record| flags.show_deleted || !record.deleted)
            .filter(|record| show_unlisted || !record.unlisted)
            .filter(|record| flags.show_enterprise || !record.is_enterprise())
            .collect();

        let total_count = visible.len();
        let features: Vec<FeatureProjection> = pagination
            .slice(&visible)
            .iter()
            .map(|record| FeatureProjection::project(record, names_only))
            .collect();

        debug!(
            matched = sorted.len(),
            visible = total_count,
            returned = features.len(),
            "Applied visibility and pagination"
        );

        Ok(SearchPage {
            features,
            total_count,
        })
    }

    async fn caller_sees_unlisted(&self, ctx: &QueryContext) -> bool {
        match ctx.caller() {
            Some(caller) => self.permissions.can_view_unlisted(caller).await,
            None => false,
        }
    }
}
