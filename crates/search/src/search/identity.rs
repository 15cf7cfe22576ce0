//! Identity-bound pseudo-fields.
//!
//! `owner:me`, `editor:me`, `cc:me`, `creator:me`, `starred-by:me`,
//! `pending-approval-by:me` and `is:recently-reviewed` are resolved against
//! the caller in the [`QueryContext`]. An anonymous caller matches nothing.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, warn};

use super::resolver::{Deferred, Resolved, lookup};
use crate::caller::{PermissionProvider, QueryContext};
use crate::core::{FeatureStore, StoreQuery};
use crate::types::enums::gate_state;
use crate::types::{Collection, Filter, Operator, Property, Term, TermKind};

/// A pseudo-field whose meaning depends on who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    /// `owner:me`
    Owner,
    /// `editor:me`
    Editor,
    /// `cc:me`
    Cc,
    /// `creator:me`
    Creator,
    /// `starred-by:me`
    StarredBy,
    /// `pending-approval-by:me`
    PendingApprovalBy,
    /// `is:recently-reviewed`
    RecentlyReviewed,
}

impl IdentityField {
    /// Recognizes a pseudo-field from a field name and raw value.
    pub fn parse(field: &str, raw_value: &str) -> Option<Self> {
        let field = field.to_ascii_lowercase();
        let value = raw_value.trim_matches('"').to_ascii_lowercase();
        match (field.as_str(), value.as_str()) {
            ("owner", "me") => Some(IdentityField::Owner),
            ("editor", "me") => Some(IdentityField::Editor),
            ("cc", "me") => Some(IdentityField::Cc),
            ("creator", "me") => Some(IdentityField::Creator),
            ("starred-by", "me") => Some(IdentityField::StarredBy),
            ("pending-approval-by", "me") => Some(IdentityField::PendingApprovalBy),
            ("is", "recently-reviewed") => Some(IdentityField::RecentlyReviewed),
            _ => None,
        }
    }

    /// Recognizes a pseudo-field term.
    pub fn from_term(term: &Term) -> Option<Self> {
        match &term.kind {
            TermKind::Field {
                field,
                operator: Operator::Eq,
                raw_value,
            } => Self::parse(field, raw_value),
            _ => None,
        }
    }
}

/// Resolves identity-bound pseudo-fields.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn FeatureStore>,
    permissions: Arc<dyn PermissionProvider>,
    recent_review_days: i64,
}

impl IdentityResolver {
    /// Creates a resolver.
    pub fn new(
        store: Arc<dyn FeatureStore>,
        permissions: Arc<dyn PermissionProvider>,
        recent_review_days: i64,
    ) -> Self {
        Self {
            store,
            permissions,
            recent_review_days,
        }
    }

    /// Resolves `field` for the caller in `ctx`.
    pub fn resolve(&self, field: IdentityField, ctx: &QueryContext) -> Deferred {
        let Some(caller) = ctx.caller() else {
            debug!(field = ?field, "Anonymous caller, identity field matches nothing");
            return Deferred::empty();
        };
        let email = caller.email().to_string();
        let label = format!("{:?}", field);

        let feature_filter = |property: Property| {
            vec![StoreQuery::new(Collection::Feature).filter(Filter::eq(property, email.as_str()))]
        };

        match field {
            IdentityField::Owner => self.spawn(feature_filter(Property::OwnerEmails), label),
            IdentityField::Editor => self.spawn(feature_filter(Property::EditorEmails), label),
            IdentityField::Cc => self.spawn(feature_filter(Property::CcEmails), label),
            IdentityField::Creator => self.spawn(feature_filter(Property::CreatorEmail), label),
            IdentityField::StarredBy => {
                let query = StoreQuery::new(Collection::Star)
                    .filter(Filter::eq(Property::StarEmail, email.as_str()))
                    .filter(Filter::eq(Property::Starred, true));
                self.spawn(vec![query], label)
            }
            IdentityField::RecentlyReviewed => {
                let now = ctx.now();
                let Some(since) = Duration::try_days(self.recent_review_days)
                    .and_then(|window| now.checked_sub_signed(window))
                else {
                    warn!(
                        days = self.recent_review_days,
                        "Recently reviewed window is out of range"
                    );
                    return Deferred::empty();
                };
                let query = StoreQuery::new(Collection::Gate)
                    .filter(Filter::one_of(
                        Property::GateState,
                        gate_state::FINAL_STATES.iter().copied(),
                    ))
                    .filter(Filter::compare(Property::ResolvedOn, Operator::Ge, since))
                    .filter(Filter::compare(Property::ResolvedOn, Operator::Le, now));
                self.spawn(vec![query], label)
            }
            IdentityField::PendingApprovalBy => {
                let store = Arc::clone(&self.store);
                let permissions = Arc::clone(&self.permissions);
                let caller = caller.clone();

                Deferred::Pending(Box::pin(async move {
                    let gate_types = permissions.approvable_gate_types(&caller).await;
                    if gate_types.is_empty() {
                        return Resolved::empty();
                    }
                    let query = StoreQuery::new(Collection::Gate)
                        .filter(Filter::one_of(Property::GateType, gate_types))
                        .filter(Filter::one_of(
                            Property::GateState,
                            gate_state::PENDING_STATES.iter().copied(),
                        ));
                    lookup(store, vec![query], false, label).resolve().await
                }))
            }
        }
    }

    fn spawn(&self, queries: Vec<StoreQuery>, label: String) -> Deferred {
        lookup(Arc::clone(&self.store), queries, false, label)
    }
}
