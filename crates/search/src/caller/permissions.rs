//! Permission collaborator.

use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;

use super::identity::Identity;

/// Answers the permission questions the query pipeline needs.
///
/// The permission system itself lives outside this crate; the engine only
/// asks which gate types a caller may approve and whether they may see
/// unlisted features.
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    /// Gate type codes the caller is an approver for.
    async fn approvable_gate_types(&self, identity: &Identity) -> BTreeSet<i64>;

    /// Whether the caller may see unlisted features without asking for them.
    async fn can_view_unlisted(&self, identity: &Identity) -> bool;
}

/// A fixed, in-memory permission table.
///
/// # Examples
///
/// ```
/// use radar_search::caller::{Identity, StaticPermissions};
/// use radar_search::types::enums::gate_type;
///
/// let permissions = StaticPermissions::new()
///     .with_approver("reviewer@example.com", [gate_type::API_SHIP])
///     .with_unlisted_viewer("admin@example.com");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticPermissions {
    approvers: HashMap<Identity, BTreeSet<i64>>,
    unlisted_viewers: HashSet<Identity>,
}

impl StaticPermissions {
    /// Creates a table that grants nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants approval rights for the given gate types.
    pub fn with_approver(
        mut self,
        email: impl Into<String>,
        gate_types: impl IntoIterator<Item = i64>,
    ) -> Self {
        self.approvers
            .entry(Identity::new(email))
            .or_default()
            .extend(gate_types);
        self
    }

    /// Lets the user see unlisted features.
    pub fn with_unlisted_viewer(mut self, email: impl Into<String>) -> Self {
        self.unlisted_viewers.insert(Identity::new(email));
        self
    }
}

#[async_trait]
impl PermissionProvider for StaticPermissions {
    async fn approvable_gate_types(&self, identity: &Identity) -> BTreeSet<i64> {
        self.approvers.get(identity).cloned().unwrap_or_default()
    }

    async fn can_view_unlisted(&self, identity: &Identity) -> bool {
        self.unlisted_viewers.contains(identity)
    }
}
