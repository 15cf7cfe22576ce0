//! Result cache eligibility and keys.
//!
//! Only results that are the same for every caller at every moment may be
//! shared: queries mentioning the caller (`owner:me`) or the clock
//! (`now-7d`, `current_stable`) are never cached, and neither are requests
//! that hide unlisted features, since whether those are hidden depends on
//! the caller's permissions.

use serde_json::json;

use super::coercer::{is_relative_literal, split_list};
use super::identity::IdentityField;
use super::tokenizer::tokenize;
use crate::types::{Pagination, SortSpec, TermKind, VisibilityFlags};

/// Returns `true` if results for `query` may be stored in the shared cache.
///
/// # Examples
///
/// ```
/// use radar_search::search::cache_gate::is_cacheable;
///
/// assert!(is_cacheable("category=Security", true));
/// assert!(!is_cacheable("category=Security", false));
/// assert!(!is_cacheable("owner:me", true));
/// assert!(!is_cacheable("created.when>now-7d", true));
/// ```
pub fn is_cacheable(query: &str, show_unlisted: bool) -> bool {
    if !show_unlisted {
        return false;
    }

    let padded = format!("{} ", query);
    !tokenize(&padded).any(|term| {
        if IdentityField::from_term(&term).is_some() {
            return true;
        }
        match &term.kind {
            TermKind::Field { raw_value, .. } => split_list(raw_value)
                .iter()
                .flat_map(|item| item.split(".."))
                .any(is_relative_literal),
            TermKind::Text(_) => false,
        }
    })
}

/// Trims the query and collapses runs of whitespace to one space.
pub fn normalize_query(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Builds the cache key for a request.
///
/// The key covers every input that can change the page, so two requests
/// share a key only when they would produce the same result.
pub fn make_cache_key(
    prefix: &str,
    query: &str,
    sort: &SortSpec,
    flags: VisibilityFlags,
    pagination: Pagination,
    names_only: bool,
) -> String {
    let parts = json!({
        "q": normalize_query(query),
        "sort": sort.to_string(),
        "show_unlisted": flags.show_unlisted,
        "show_deleted": flags.show_deleted,
        "show_enterprise": flags.show_enterprise,
        "start": pagination.start,
        "num": pagination.num,
        "names_only": names_only,
    });
    format!("{}:{}", prefix, parts)
}
