//! Clause combination.
//!
//! Terms within a clause are intersected and clauses are unioned. A negated
//! term removes its matches from the clause; a clause with nothing but
//! negated terms starts from every feature in the store (the universe),
//! which is fetched at most once per query and only when such a clause
//! exists.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::resolver::{Deferred, Resolved};
use crate::core::{FeatureStore, StoreQuery};
use crate::types::{Collection, FeatureId, Query};

/// Every feature id in the store, fetched on first use.
pub struct Universe {
    store: Arc<dyn FeatureStore>,
    ids: OnceCell<BTreeSet<FeatureId>>,
}

impl Universe {
    /// Creates an unfetched universe.
    pub fn new(store: Arc<dyn FeatureStore>) -> Self {
        Self {
            store,
            ids: OnceCell::new(),
        }
    }

    /// Returns all feature ids, fetching them on the first call.
    ///
    /// A failed fetch is logged and yields an empty universe.
    pub async fn get(&self) -> &BTreeSet<FeatureId> {
        self.ids
            .get_or_init(|| async {
                match self
                    .store
                    .fetch_ids(&StoreQuery::new(Collection::Feature))
                    .await
                {
                    Ok(ids) => {
                        debug!(count = ids.len(), "Materialized feature universe");
                        ids.into_iter().collect()
                    }
                    Err(e) => {
                        warn!(
                            backend = self.store.backend_name(),
                            error = %e,
                            "Failed to load all features for negation"
                        );
                        BTreeSet::new()
                    }
                }
            })
            .await
    }

    /// Returns `true` once the ids have been fetched.
    pub fn is_materialized(&self) -> bool {
        self.ids.initialized()
    }
}

/// Runs all pending lookups concurrently and returns results in input order.
///
/// A lookup task that panics or is cancelled is logged and counts as an
/// empty result; it never affects its siblings.
pub async fn join_all(deferred: Vec<Deferred>) -> Vec<Resolved> {
    let mut results: Vec<Option<Resolved>> = vec![None; deferred.len()];
    let mut tasks: JoinSet<(usize, Resolved)> = JoinSet::new();

    for (index, lookup) in deferred.into_iter().enumerate() {
        match lookup {
            Deferred::Ready(resolved) => results[index] = Some(resolved),
            Deferred::Pending(future) => {
                tasks.spawn(async move { (index, future.await) });
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, resolved)) => results[index] = Some(resolved),
            Err(e) => {
                warn!(error = %e, "Term lookup task failed, treating it as matching nothing");
            }
        }
    }

    results.into_iter().map(Option::unwrap_or_default).collect()
}

/// Combines per-term results into the ids matching `query`.
///
/// `resolved` holds one entry per term of `query`, in textual order. An
/// empty query matches the whole universe.
pub async fn combine(
    query: &Query,
    resolved: Vec<Resolved>,
    universe: &Universe,
) -> BTreeSet<FeatureId> {
    if query.is_empty() {
        return universe.get().await.clone();
    }

    let mut results = resolved.into_iter();
    let mut matched = BTreeSet::new();

    for clause in &query.clauses {
        let mut includes: Vec<BTreeSet<FeatureId>> = Vec::new();
        let mut excludes: Vec<BTreeSet<FeatureId>> = Vec::new();

        for term in &clause.terms {
            let result = results.next().unwrap_or_default();
            if term.negated && !result.complemented {
                excludes.push(result.ids);
            } else {
                includes.push(result.ids);
            }
        }

        let mut clause_ids = match includes.split_first() {
            Some((first, rest)) => {
                let mut ids = first.clone();
                for other in rest {
                    ids.retain(|id| other.contains(id));
                }
                ids
            }
            None => universe.get().await.clone(),
        };
        for excluded in &excludes {
            clause_ids.retain(|id| !excluded.contains(id));
        }

        matched.extend(clause_ids);
    }

    matched
}
