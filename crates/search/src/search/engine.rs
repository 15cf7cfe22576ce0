//! The query pipeline.
//!
//! [`FeatureSearch::process_query`] runs a request through every stage:
//!
//! ```text
//! cache probe -> tokenize -> group -> dispatch terms ─┐
//!                                     total order ────┼─> combine -> reorder
//!                                                     │       -> visibility/page -> cache fill
//! ```
//!
//! Term lookups and the sort lookup run concurrently. Failed lookups never
//! fail the request; only invalid pagination parameters and a failure to
//! load the final records do.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::cache_gate::{is_cacheable, make_cache_key};
use super::combinator::{Universe, combine, join_all};
use super::identity::{IdentityField, IdentityResolver};
use super::resolver::{Deferred, FieldResolver};
use super::sorter::{Sorter, reorder};
use super::tokenizer::tokenize;
use super::visibility::VisibilityFilter;
use crate::caller::{PermissionProvider, QueryContext};
use crate::config::SearchConfig;
use crate::core::{FeatureStore, ResultCache};
use crate::error::SearchResult;
use crate::types::{Pagination, Query, SearchPage, SortSpec, Term, TermKind, VisibilityFlags};

/// One search request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    /// Raw query text.
    pub query: String,
    /// Sort spec; `None` uses [`SearchConfig::default_sort`].
    pub sort: Option<SortSpec>,
    /// Which hidden records to include.
    pub flags: VisibilityFlags,
    /// Result window.
    pub pagination: Pagination,
    /// Return only ids and names.
    pub names_only: bool,
}

impl SearchRequest {
    /// Creates a request for `query` with default options.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Builds a request from raw request parameters.
    ///
    /// Fails if `start` or `num` is negative or not an integer. An empty
    /// `sort` is treated as absent.
    pub fn from_params(
        query: impl Into<String>,
        sort: Option<&str>,
        start: Option<&str>,
        num: Option<&str>,
    ) -> SearchResult<Self> {
        Ok(Self {
            query: query.into(),
            sort: sort
                .filter(|s| !s.trim().is_empty())
                .map(SortSpec::parse),
            pagination: Pagination::from_params(start, num)?,
            ..Default::default()
        })
    }

    /// Sets the sort spec.
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets the visibility flags.
    pub fn with_flags(mut self, flags: VisibilityFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the result window.
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// Requests names-only projections.
    pub fn with_names_only(mut self, names_only: bool) -> Self {
        self.names_only = names_only;
        self
    }
}

/// Feature search over a store, a permission system and an optional cache.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chrono::Utc;
/// use radar_search::backends::memory::MemoryStore;
/// use radar_search::caller::{QueryContext, StaticPermissions};
/// use radar_search::search::{FeatureSearch, SearchRequest};
/// use radar_search::types::FeatureRecord;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = MemoryStore::new();
/// store.insert_feature(FeatureRecord::new(1, "CSS Grid", Utc::now()));
///
/// let search = FeatureSearch::new(Arc::new(store), Arc::new(StaticPermissions::new()));
/// let ctx = QueryContext::new(Utc::now(), 124);
/// let page = search.process_query(&SearchRequest::new("grid"), &ctx).await.unwrap();
/// assert_eq!(page.ids(), vec![1]);
/// # }
/// ```
#[derive(Clone)]
pub struct FeatureSearch {
    store: Arc<dyn FeatureStore>,
    permissions: Arc<dyn PermissionProvider>,
    cache: Option<Arc<dyn ResultCache>>,
    config: SearchConfig,
}

impl FeatureSearch {
    /// Creates an uncached search with the default configuration.
    pub fn new(store: Arc<dyn FeatureStore>, permissions: Arc<dyn PermissionProvider>) -> Self {
        Self {
            store,
            permissions,
            cache: None,
            config: SearchConfig::default(),
        }
    }

    /// Enables the shared result cache.
    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs `request` for the caller described by `ctx`.
    #[instrument(
        skip(self, request, ctx),
        fields(query = %request.query, backend = self.store.backend_name())
    )]
    pub async fn process_query(
        &self,
        request: &SearchRequest,
        ctx: &QueryContext,
    ) -> SearchResult<SearchPage> {
        let sort = request
            .sort
            .clone()
            .unwrap_or_else(|| self.config.default_sort_spec());

        let cache_entry = match &self.cache {
            Some(cache) if is_cacheable(&request.query, request.flags.show_unlisted) => {
                let key = make_cache_key(
                    &self.config.cache_key_prefix,
                    &request.query,
                    &sort,
                    request.flags,
                    request.pagination,
                    request.names_only,
                );
                Some((Arc::clone(cache), key))
            }
            _ => None,
        };

        if let Some((cache, key)) = &cache_entry {
            match cache.get(key).await {
                Ok(Some(page)) => {
                    debug!(cache = cache.backend_name(), "Cache hit");
                    return Ok(page);
                }
                Ok(None) => debug!(cache = cache.backend_name(), "Cache miss"),
                Err(e) => warn!(
                    cache = cache.backend_name(),
                    error = %e,
                    "Cache read failed, computing results"
                ),
            }
        }

        let padded = format!("{} ", request.query);
        let query = Query::from_terms(tokenize(&padded));
        debug!(
            clauses = query.clauses.len(),
            terms = query.terms().count(),
            "Parsed query"
        );

        let deferred: Vec<Deferred> = query.terms().map(|term| self.dispatch(term, ctx)).collect();
        let sorter = Sorter::new(Arc::clone(&self.store));
        let (resolved, order) = tokio::join!(join_all(deferred), sorter.total_order(&sort));

        let universe = Universe::new(Arc::clone(&self.store));
        let matched = combine(&query, resolved, &universe).await;
        let sorted = reorder(&matched, &order);
        debug!(matched = sorted.len(), sort = %sort, "Combined and sorted");

        let page = VisibilityFilter::new(Arc::clone(&self.store), Arc::clone(&self.permissions))
            .apply(
                &sorted,
                request.flags,
                request.pagination,
                request.names_only,
                ctx,
            )
            .await?;

        if let Some((cache, key)) = cache_entry
            && let Err(e) = cache.set(&key, page.clone()).await
        {
            warn!(
                cache = cache.backend_name(),
                error = %e,
                "Cache write failed"
            );
        }

        Ok(page)
    }

    fn dispatch(&self, term: &Term, ctx: &QueryContext) -> Deferred {
        if let Some(field) = IdentityField::from_term(term) {
            return IdentityResolver::new(
                Arc::clone(&self.store),
                Arc::clone(&self.permissions),
                self.config.recent_review_days,
            )
            .resolve(field, ctx);
        }

        let fields = FieldResolver::new(Arc::clone(&self.store));
        match &term.kind {
            TermKind::Field {
                field,
                operator,
                raw_value,
            } => fields.resolve_field(field, *operator, raw_value, term.negated, ctx),
            TermKind::Text(text) => fields.resolve_text(text),
        }
    }
}
