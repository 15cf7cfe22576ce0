//! Stored record types.
//!
//! These are the rows of the four collections a [`FeatureStore`](crate::core::FeatureStore)
//! exposes. The engine never reads record fields directly during filtering;
//! it goes through [`Record::values`] so every backend shares one notion of
//! which values a record carries for a [`Property`].

// Record fields mirror the stored columns one to one
#![allow(missing_docs)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::feature_type;
use super::property::{Collection, Property};
use super::value::FieldValue;

/// Identifier of a feature entry.
pub type FeatureId = i64;

/// Common view over records of any collection.
pub trait Record {
    /// The collection this record belongs to.
    const COLLECTION: Collection;

    /// The feature this record belongs to (its own id for features).
    fn feature_id(&self) -> FeatureId;

    /// The values this record carries for `property`.
    ///
    /// Empty for absent optional values, for empty repeated values, and for
    /// properties of another collection.
    fn values(&self, property: Property) -> Vec<FieldValue>;
}

fn text_values(values: &[String]) -> Vec<FieldValue> {
    values.iter().map(|v| FieldValue::Text(v.clone())).collect()
}

fn optional<T: Into<FieldValue> + Clone>(value: &Option<T>) -> Vec<FieldValue> {
    value.iter().cloned().map(Into::<FieldValue>::into).collect()
}

/// A feature entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub id: FeatureId,
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub category: i64,
    #[serde(default)]
    pub feature_type: i64,
    #[serde(default)]
    pub impl_status_chrome: i64,
    #[serde(default)]
    pub intent_stage: i64,
    #[serde(default)]
    pub standard_maturity: i64,
    #[serde(default)]
    pub owner_emails: Vec<String>,
    #[serde(default)]
    pub editor_emails: Vec<String>,
    #[serde(default)]
    pub cc_emails: Vec<String>,
    #[serde(default)]
    pub creator_email: Option<String>,
    #[serde(default)]
    pub blink_components: Vec<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub accurate_as_of: Option<DateTime<Utc>>,
    #[serde(default)]
    pub shipping_year: Option<i64>,
    #[serde(default)]
    pub star_count: i64,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub unlisted: bool,
}

impl FeatureRecord {
    /// Creates a listed, non-deleted feature with default codes.
    pub fn new(id: FeatureId, name: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            summary: String::new(),
            category: 0,
            feature_type: feature_type::INCUBATE,
            impl_status_chrome: 0,
            intent_stage: 0,
            standard_maturity: 0,
            owner_emails: Vec::new(),
            editor_emails: Vec::new(),
            cc_emails: Vec::new(),
            creator_email: None,
            blink_components: Vec::new(),
            created,
            updated: created,
            accurate_as_of: None,
            shipping_year: None,
            star_count: 0,
            deleted: false,
            unlisted: false,
        }
    }

    /// Returns `true` if the feature is only relevant to enterprise admins.
    pub fn is_enterprise(&self) -> bool {
        self.feature_type == feature_type::ENTERPRISE
    }
}

impl Record for FeatureRecord {
    const COLLECTION: Collection = Collection::Feature;

    fn feature_id(&self) -> FeatureId {
        self.id
    }

    fn values(&self, property: Property) -> Vec<FieldValue> {
        match property {
            Property::FeatureId => vec![self.id.into()],
            Property::Name => vec![self.name.clone().into()],
            Property::Summary => vec![self.summary.clone().into()],
            Property::Category => vec![self.category.into()],
            Property::FeatureType => vec![self.feature_type.into()],
            Property::ImplStatusChrome => vec![self.impl_status_chrome.into()],
            Property::IntentStage => vec![self.intent_stage.into()],
            Property::StandardMaturity => vec![self.standard_maturity.into()],
            Property::OwnerEmails => text_values(&self.owner_emails),
            Property::EditorEmails => text_values(&self.editor_emails),
            Property::CcEmails => text_values(&self.cc_emails),
            Property::CreatorEmail => optional(&self.creator_email),
            Property::BlinkComponents => text_values(&self.blink_components),
            Property::Created => vec![self.created.into()],
            Property::Updated => vec![self.updated.into()],
            Property::AccurateAsOf => optional(&self.accurate_as_of),
            Property::ShippingYear => optional(&self.shipping_year),
            Property::StarCount => vec![self.star_count.into()],
            Property::Deleted => vec![self.deleted.into()],
            Property::Unlisted => vec![self.unlisted.into()],
            _ => Vec::new(),
        }
    }
}

/// A stage of a feature's launch process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub id: i64,
    pub feature_id: FeatureId,
    pub stage_type: i64,
    #[serde(default)]
    pub desktop_first: Option<i64>,
    #[serde(default)]
    pub desktop_last: Option<i64>,
    #[serde(default)]
    pub android_first: Option<i64>,
    #[serde(default)]
    pub android_last: Option<i64>,
    #[serde(default)]
    pub ios_first: Option<i64>,
    #[serde(default)]
    pub webview_first: Option<i64>,
    #[serde(default)]
    pub rollout_milestone: Option<i64>,
}

impl StageRecord {
    /// Creates a stage with no milestones set.
    pub fn new(id: i64, feature_id: FeatureId, stage_type: i64) -> Self {
        Self {
            id,
            feature_id,
            stage_type,
            desktop_first: None,
            desktop_last: None,
            android_first: None,
            android_last: None,
            ios_first: None,
            webview_first: None,
            rollout_milestone: None,
        }
    }
}

impl Record for StageRecord {
    const COLLECTION: Collection = Collection::Stage;

    fn feature_id(&self) -> FeatureId {
        self.feature_id
    }

    fn values(&self, property: Property) -> Vec<FieldValue> {
        match property {
            Property::StageFeatureId => vec![self.feature_id.into()],
            Property::StageType => vec![self.stage_type.into()],
            Property::DesktopFirst => optional(&self.desktop_first),
            Property::DesktopLast => optional(&self.desktop_last),
            Property::AndroidFirst => optional(&self.android_first),
            Property::AndroidLast => optional(&self.android_last),
            Property::IosFirst => optional(&self.ios_first),
            Property::WebviewFirst => optional(&self.webview_first),
            Property::RolloutMilestone => optional(&self.rollout_milestone),
            _ => Vec::new(),
        }
    }
}

/// A review gate attached to a feature stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRecord {
    pub id: i64,
    pub feature_id: FeatureId,
    #[serde(default)]
    pub stage_id: i64,
    pub gate_type: i64,
    pub state: i64,
    #[serde(default)]
    pub requested_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved_on: Option<DateTime<Utc>>,
}

impl Record for GateRecord {
    const COLLECTION: Collection = Collection::Gate;

    fn feature_id(&self) -> FeatureId {
        self.feature_id
    }

    fn values(&self, property: Property) -> Vec<FieldValue> {
        match property {
            Property::GateFeatureId => vec![self.feature_id.into()],
            Property::GateType => vec![self.gate_type.into()],
            Property::GateState => vec![self.state.into()],
            Property::RequestedOn => optional(&self.requested_on),
            Property::ResolvedOn => optional(&self.resolved_on),
            _ => Vec::new(),
        }
    }
}

/// A user's star on a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRecord {
    pub email: String,
    pub feature_id: FeatureId,
    #[serde(default = "default_starred")]
    pub starred: bool,
}

fn default_starred() -> bool {
    true
}

impl Record for StarRecord {
    const COLLECTION: Collection = Collection::Star;

    fn feature_id(&self) -> FeatureId {
        self.feature_id
    }

    fn values(&self, property: Property) -> Vec<FieldValue> {
        match property {
            Property::StarFeatureId => vec![self.feature_id.into()],
            Property::StarEmail => vec![self.email.clone().into()],
            Property::Starred => vec![self.starred.into()],
            _ => Vec::new(),
        }
    }
}
