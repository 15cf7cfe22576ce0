//! Typed property references and store filters.
//!
//! Every property the engine can filter or order on is a variant of the
//! closed [`Property`] enum. A property belongs to exactly one [`Collection`],
//! has a fixed [`ValueKind`] and a [`Cardinality`] that decides whether
//! operator complements are safe to use in place of set subtraction.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::value::FieldValue;

/// The record collections a store exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Primary feature entries.
    Feature,
    /// Per-feature stages (joined to features by `feature_id`).
    Stage,
    /// Review gates (joined to features by `feature_id`).
    Gate,
    /// User stars (joined to features by `feature_id`).
    Star,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Feature => write!(f, "feature"),
            Collection::Stage => write!(f, "stage"),
            Collection::Gate => write!(f, "gate"),
            Collection::Star => write!(f, "star"),
        }
    }
}

/// The storage type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Integer (ids, codes, milestones, counts).
    Int,
    /// Floating point.
    Float,
    /// Timestamp.
    DateTime,
    /// Boolean flag.
    Bool,
    /// Text.
    Text,
}

/// How many values a record carries for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Exactly one value on every record.
    Required,
    /// Zero or one value.
    Optional,
    /// Any number of values; a filter matches if any value satisfies it.
    Repeated,
}

/// A property of one of the store collections.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    FeatureId,
    Name,
    Summary,
    Category,
    FeatureType,
    ImplStatusChrome,
    IntentStage,
    StandardMaturity,
    OwnerEmails,
    EditorEmails,
    CcEmails,
    CreatorEmail,
    BlinkComponents,
    Created,
    Updated,
    AccurateAsOf,
    ShippingYear,
    StarCount,
    Deleted,
    Unlisted,

    StageFeatureId,
    StageType,
    DesktopFirst,
    DesktopLast,
    AndroidFirst,
    AndroidLast,
    IosFirst,
    WebviewFirst,
    RolloutMilestone,

    GateFeatureId,
    GateType,
    GateState,
    RequestedOn,
    ResolvedOn,

    StarFeatureId,
    StarEmail,
    Starred,
}

impl Property {
    /// Returns the collection this property belongs to.
    pub fn collection(self) -> Collection {
        use Property::*;
        match self {
            FeatureId | Name | Summary | Category | FeatureType | ImplStatusChrome
            | IntentStage | StandardMaturity | OwnerEmails | EditorEmails | CcEmails
            | CreatorEmail | BlinkComponents | Created | Updated | AccurateAsOf
            | ShippingYear | StarCount | Deleted | Unlisted => Collection::Feature,
            StageFeatureId | StageType | DesktopFirst | DesktopLast | AndroidFirst
            | AndroidLast | IosFirst | WebviewFirst | RolloutMilestone => Collection::Stage,
            GateFeatureId | GateType | GateState | RequestedOn | ResolvedOn => Collection::Gate,
            StarFeatureId | StarEmail | Starred => Collection::Star,
        }
    }

    /// Returns the storage type of this property.
    pub fn kind(self) -> ValueKind {
        use Property::*;
        match self {
            Name | Summary | OwnerEmails | EditorEmails | CcEmails | CreatorEmail
            | BlinkComponents | StarEmail => ValueKind::Text,
            Created | Updated | AccurateAsOf | RequestedOn | ResolvedOn => ValueKind::DateTime,
            Deleted | Unlisted | Starred => ValueKind::Bool,
            _ => ValueKind::Int,
        }
    }

    /// Returns how many values a record carries for this property.
    pub fn cardinality(self) -> Cardinality {
        use Property::*;
        match self {
            OwnerEmails | EditorEmails | CcEmails | BlinkComponents => Cardinality::Repeated,
            CreatorEmail | AccurateAsOf | ShippingYear | DesktopFirst | DesktopLast
            | AndroidFirst | AndroidLast | IosFirst | WebviewFirst | RolloutMilestone
            | RequestedOn | ResolvedOn => Cardinality::Optional,
            _ => Cardinality::Required,
        }
    }

    /// The storage name of the property, as written in logs.
    pub fn name(self) -> &'static str {
        use Property::*;
        match self {
            FeatureId => "feature.id",
            Name => "feature.name",
            Summary => "feature.summary",
            Category => "feature.category",
            FeatureType => "feature.feature_type",
            ImplStatusChrome => "feature.impl_status_chrome",
            IntentStage => "feature.intent_stage",
            StandardMaturity => "feature.standard_maturity",
            OwnerEmails => "feature.owner_emails",
            EditorEmails => "feature.editor_emails",
            CcEmails => "feature.cc_emails",
            CreatorEmail => "feature.creator_email",
            BlinkComponents => "feature.blink_components",
            Created => "feature.created",
            Updated => "feature.updated",
            AccurateAsOf => "feature.accurate_as_of",
            ShippingYear => "feature.shipping_year",
            StarCount => "feature.star_count",
            Deleted => "feature.deleted",
            Unlisted => "feature.unlisted",
            StageFeatureId => "stage.feature_id",
            StageType => "stage.stage_type",
            DesktopFirst => "stage.desktop_first",
            DesktopLast => "stage.desktop_last",
            AndroidFirst => "stage.android_first",
            AndroidLast => "stage.android_last",
            IosFirst => "stage.ios_first",
            WebviewFirst => "stage.webview_first",
            RolloutMilestone => "stage.rollout_milestone",
            GateFeatureId => "gate.feature_id",
            GateType => "gate.gate_type",
            GateState => "gate.state",
            RequestedOn => "gate.requested_on",
            ResolvedOn => "gate.resolved_on",
            StarFeatureId => "star.feature_id",
            StarEmail => "star.email",
            Starred => "star.starred",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparison operators shared by query terms and store filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Operator {
    /// Equal (default).
    #[default]
    Eq,
    /// Not equal.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

impl Operator {
    /// Returns the operator selecting exactly the values this one rejects.
    pub fn complement(self) -> Self {
        match self {
            Operator::Eq => Operator::Ne,
            Operator::Ne => Operator::Eq,
            Operator::Lt => Operator::Ge,
            Operator::Ge => Operator::Lt,
            Operator::Le => Operator::Gt,
            Operator::Gt => Operator::Le,
        }
    }

    /// Returns `true` if `actual.cmp(operand) == ordering` satisfies this operator.
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Ge => ordering != Ordering::Less,
        }
    }

    /// The query-language spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = String;

    /// Parses an operator; the colon form of pseudo-field terms means `=`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" | ":" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            _ => Err(format!("unknown operator: {}", s)),
        }
    }
}

/// The test a filter applies to a property's values.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Compare against one operand.
    Compare(Operator, FieldValue),
    /// Membership in a small list of operands.
    In(Vec<FieldValue>),
}

/// A single-property filter in a store query.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// The filtered property.
    pub property: Property,
    /// The condition applied to it.
    pub condition: Condition,
}

impl Filter {
    /// Creates a comparison filter.
    pub fn compare(property: Property, op: Operator, value: impl Into<FieldValue>) -> Self {
        Self {
            property,
            condition: Condition::Compare(op, value.into()),
        }
    }

    /// Creates an equality filter.
    pub fn eq(property: Property, value: impl Into<FieldValue>) -> Self {
        Self::compare(property, Operator::Eq, value)
    }

    /// Creates a membership filter.
    pub fn one_of<I, V>(property: Property, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        Self {
            property,
            condition: Condition::In(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Evaluates the filter against the values a record holds for the property.
    ///
    /// A record with no value never matches, and a repeated property matches
    /// if any one of its values satisfies the condition.
    pub fn matches(&self, values: &[FieldValue]) -> bool {
        values.iter().any(|value| match &self.condition {
            Condition::Compare(op, operand) => value
                .compare(operand)
                .is_some_and(|ordering| op.accepts(ordering)),
            Condition::In(operands) => operands
                .iter()
                .any(|operand| value.compare(operand) == Some(Ordering::Equal)),
        })
    }
}

/// Ordering requested from a store query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOrder {
    /// The property to order by.
    pub property: Property,
    /// Whether to order from largest to smallest.
    pub descending: bool,
}
