//! Who is asking, and what they may see.
//!
//! - [`Identity`] - the signed-in caller
//! - [`QueryContext`] - explicit per-request inputs (clock, milestone, caller)
//! - [`PermissionProvider`] - the external permission system's interface
//! - [`StaticPermissions`] - a fixed table for tests and the CLI

mod context;
mod identity;
mod permissions;

pub use context::QueryContext;
pub use identity::Identity;
pub use permissions::{PermissionProvider, StaticPermissions};
