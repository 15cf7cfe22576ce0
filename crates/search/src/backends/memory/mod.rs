//! In-memory reference backends.
//!
//! These implement the collaborator traits over plain vectors and maps. They
//! back the integration tests and the `radar` command-line runner.

mod cache;
mod store;

pub use cache::MemoryCache;
pub use store::{MemoryFixture, MemoryStore};
