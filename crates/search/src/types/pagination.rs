//! Pagination, visibility and result page types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::records::{FeatureId, FeatureRecord};
use crate::error::{SearchError, SearchResult};

/// Offset pagination over the filtered, sorted result list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of results to skip.
    pub start: usize,
    /// Maximum number of results to return; `None` returns everything.
    pub num: Option<usize>,
}

impl Pagination {
    /// Creates pagination from already validated values.
    pub fn new(start: usize, num: Option<usize>) -> Self {
        Self { start, num }
    }

    /// Parses the raw `start` and `num` request parameters.
    ///
    /// Omitted parameters mean "from the beginning" and "no limit". Values
    /// that are negative or not integers are rejected.
    pub fn from_params(start: Option<&str>, num: Option<&str>) -> SearchResult<Self> {
        let start = match start {
            Some(raw) => parse_param("start", raw)?,
            None => 0,
        };
        let num = num.map(|raw| parse_param("num", raw)).transpose()?;
        Ok(Self { start, num })
    }

    /// Returns the window of `items` this pagination selects.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.start.min(items.len());
        let end = match self.num {
            Some(num) => start.saturating_add(num).min(items.len()),
            None => items.len(),
        };
        &items[start..end]
    }
}

fn parse_param(parameter: &str, raw: &str) -> SearchResult<usize> {
    let invalid = |message: &str| SearchError::InvalidPagination {
        parameter: parameter.to_string(),
        value: raw.to_string(),
        message: message.to_string(),
    };

    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("must be an integer"))?;
    if value < 0 {
        return Err(invalid("must not be negative"));
    }
    usize::try_from(value).map_err(|_| invalid("out of range"))
}

/// Which normally hidden records a request wants to see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisibilityFlags {
    /// Include unlisted features.
    pub show_unlisted: bool,
    /// Include deleted features.
    pub show_deleted: bool,
    /// Include enterprise-only features.
    pub show_enterprise: bool,
}

/// The fields of a feature returned in a full result page.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub id: FeatureId,
    pub name: String,
    pub summary: String,
    pub category: i64,
    pub feature_type: i64,
    pub impl_status_chrome: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub owner_emails: Vec<String>,
}

impl From<&FeatureRecord> for FeatureSummary {
    fn from(record: &FeatureRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            summary: record.summary.clone(),
            category: record.category,
            feature_type: record.feature_type,
            impl_status_chrome: record.impl_status_chrome,
            created: record.created,
            updated: record.updated,
            owner_emails: record.owner_emails.clone(),
        }
    }
}

/// One entry of a result page.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureProjection {
    /// Full summary.
    Full(FeatureSummary),
    /// Only id and name (names-only requests).
    NameOnly { id: FeatureId, name: String },
}

impl FeatureProjection {
    /// Projects a record, honoring the names-only flag.
    pub fn project(record: &FeatureRecord, names_only: bool) -> Self {
        if names_only {
            FeatureProjection::NameOnly {
                id: record.id,
                name: record.name.clone(),
            }
        } else {
            FeatureProjection::Full(record.into())
        }
    }

    /// The id of the projected feature.
    pub fn id(&self) -> FeatureId {
        match self {
            FeatureProjection::Full(summary) => summary.id,
            FeatureProjection::NameOnly { id, .. } => *id,
        }
    }
}

/// A page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// The requested window of matching features, in sort order.
    pub features: Vec<FeatureProjection>,
    /// Number of visible matches before pagination.
    pub total_count: usize,
}

impl SearchPage {
    /// Ids of the features on this page, in order.
    pub fn ids(&self) -> Vec<FeatureId> {
        self.features.iter().map(FeatureProjection::id).collect()
    }
}
