//! Query field binding table.
//!
//! Maps every field name the query language accepts to the store property
//! it filters. Fields are a closed enum so that the table cannot silently
//! miss an entry; [`QueryField::ALL`] lists them for lookup and tests.

use std::fmt;

use crate::types::enums::stage_type;
use crate::types::{Collection, EnumKind, Property};

/// Where a field's values live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingTarget {
    /// A property of the feature entry itself.
    Primary,
    /// A property of the feature's stages of the given types.
    Joined {
        /// Stage types the lookup is restricted to.
        stage_types: &'static [i64],
    },
}

/// How a query field maps onto stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBinding {
    /// Primary or joined.
    pub target: BindingTarget,
    /// The filtered property.
    pub property: Property,
    /// Enumeration used to resolve display names, for enum-coded fields.
    pub enum_kind: Option<EnumKind>,
    /// Whether the store can filter on the property.
    pub indexed: bool,
}

impl FieldBinding {
    const fn primary(property: Property) -> Self {
        Self {
            target: BindingTarget::Primary,
            property,
            enum_kind: None,
            indexed: true,
        }
    }

    const fn enumerated(property: Property, kind: EnumKind) -> Self {
        Self {
            target: BindingTarget::Primary,
            property,
            enum_kind: Some(kind),
            indexed: true,
        }
    }

    const fn unindexed(property: Property) -> Self {
        Self {
            target: BindingTarget::Primary,
            property,
            enum_kind: None,
            indexed: false,
        }
    }

    const fn joined(property: Property, stage_types: &'static [i64]) -> Self {
        Self {
            target: BindingTarget::Joined { stage_types },
            property,
            enum_kind: None,
            indexed: true,
        }
    }

    /// The collection a lookup for this binding runs against.
    pub fn collection(&self) -> Collection {
        self.property.collection()
    }
}

/// Every field name the query language accepts.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryField {
    Id,
    Name,
    Summary,
    Category,
    FeatureType,
    ImplStatusChrome,
    IntentStage,
    StandardMaturity,
    Owner,
    Editor,
    Cc,
    Creator,
    BlinkComponent,
    CreatedWhen,
    UpdatedWhen,
    AccurateAsOf,
    ShippingYear,
    StarCount,
    ChromeDesktop,
    ChromeAndroid,
    ChromeIos,
    ChromeWebview,
    OriginTrialDesktopStart,
    OriginTrialDesktopEnd,
    OriginTrialAndroidStart,
    OriginTrialAndroidEnd,
    DevTrialDesktopStart,
    DevTrialAndroidStart,
    RolloutMilestone,
}

impl QueryField {
    /// All fields, in table order.
    pub const ALL: &'static [QueryField] = &[
        QueryField::Id,
        QueryField::Name,
        QueryField::Summary,
        QueryField::Category,
        QueryField::FeatureType,
        QueryField::ImplStatusChrome,
        QueryField::IntentStage,
        QueryField::StandardMaturity,
        QueryField::Owner,
        QueryField::Editor,
        QueryField::Cc,
        QueryField::Creator,
        QueryField::BlinkComponent,
        QueryField::CreatedWhen,
        QueryField::UpdatedWhen,
        QueryField::AccurateAsOf,
        QueryField::ShippingYear,
        QueryField::StarCount,
        QueryField::ChromeDesktop,
        QueryField::ChromeAndroid,
        QueryField::ChromeIos,
        QueryField::ChromeWebview,
        QueryField::OriginTrialDesktopStart,
        QueryField::OriginTrialDesktopEnd,
        QueryField::OriginTrialAndroidStart,
        QueryField::OriginTrialAndroidEnd,
        QueryField::DevTrialDesktopStart,
        QueryField::DevTrialAndroidStart,
        QueryField::RolloutMilestone,
    ];

    /// The name used in queries.
    pub fn name(self) -> &'static str {
        match self {
            QueryField::Id => "id",
            QueryField::Name => "name",
            QueryField::Summary => "summary",
            QueryField::Category => "category",
            QueryField::FeatureType => "feature_type",
            QueryField::ImplStatusChrome => "impl_status_chrome",
            QueryField::IntentStage => "intent_stage",
            QueryField::StandardMaturity => "standard_maturity",
            QueryField::Owner => "owner",
            QueryField::Editor => "editor",
            QueryField::Cc => "cc",
            QueryField::Creator => "creator",
            QueryField::BlinkComponent => "blink_component",
            QueryField::CreatedWhen => "created.when",
            QueryField::UpdatedWhen => "updated.when",
            QueryField::AccurateAsOf => "accurate_as_of",
            QueryField::ShippingYear => "shipping_year",
            QueryField::StarCount => "star_count",
            QueryField::ChromeDesktop => "browsers.chrome.desktop",
            QueryField::ChromeAndroid => "browsers.chrome.android",
            QueryField::ChromeIos => "browsers.chrome.ios",
            QueryField::ChromeWebview => "browsers.chrome.webview",
            QueryField::OriginTrialDesktopStart => "browsers.chrome.ot.desktop.start",
            QueryField::OriginTrialDesktopEnd => "browsers.chrome.ot.desktop.end",
            QueryField::OriginTrialAndroidStart => "browsers.chrome.ot.android.start",
            QueryField::OriginTrialAndroidEnd => "browsers.chrome.ot.android.end",
            QueryField::DevTrialDesktopStart => "browsers.chrome.devtrial.desktop.start",
            QueryField::DevTrialAndroidStart => "browsers.chrome.devtrial.android.start",
            QueryField::RolloutMilestone => "rollout_milestone",
        }
    }

    /// Looks up a field by name, ignoring ASCII case.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(name))
    }

    /// The binding of this field.
    pub fn binding(self) -> FieldBinding {
        use stage_type::{DEV_TRIAL_STAGES, ORIGIN_TRIAL_STAGES, ROLLOUT_STAGES, SHIPPING_STAGES};

        match self {
            QueryField::Id => FieldBinding::primary(Property::FeatureId),
            QueryField::Name => FieldBinding::unindexed(Property::Name),
            QueryField::Summary => FieldBinding::unindexed(Property::Summary),
            QueryField::Category => FieldBinding::enumerated(Property::Category, EnumKind::Category),
            QueryField::FeatureType => {
                FieldBinding::enumerated(Property::FeatureType, EnumKind::FeatureType)
            }
            QueryField::ImplStatusChrome => {
                FieldBinding::enumerated(Property::ImplStatusChrome, EnumKind::ImplStatus)
            }
            QueryField::IntentStage => {
                FieldBinding::enumerated(Property::IntentStage, EnumKind::IntentStage)
            }
            QueryField::StandardMaturity => {
                FieldBinding::enumerated(Property::StandardMaturity, EnumKind::StandardMaturity)
            }
            QueryField::Owner => FieldBinding::primary(Property::OwnerEmails),
            QueryField::Editor => FieldBinding::primary(Property::EditorEmails),
            QueryField::Cc => FieldBinding::primary(Property::CcEmails),
            QueryField::Creator => FieldBinding::primary(Property::CreatorEmail),
            QueryField::BlinkComponent => FieldBinding::primary(Property::BlinkComponents),
            QueryField::CreatedWhen => FieldBinding::primary(Property::Created),
            QueryField::UpdatedWhen => FieldBinding::primary(Property::Updated),
            QueryField::AccurateAsOf => FieldBinding::primary(Property::AccurateAsOf),
            QueryField::ShippingYear => FieldBinding::primary(Property::ShippingYear),
            QueryField::StarCount => FieldBinding::primary(Property::StarCount),
            QueryField::ChromeDesktop => {
                FieldBinding::joined(Property::DesktopFirst, SHIPPING_STAGES)
            }
            QueryField::ChromeAndroid => {
                FieldBinding::joined(Property::AndroidFirst, SHIPPING_STAGES)
            }
            QueryField::ChromeIos => FieldBinding::joined(Property::IosFirst, SHIPPING_STAGES),
            QueryField::ChromeWebview => {
                FieldBinding::joined(Property::WebviewFirst, SHIPPING_STAGES)
            }
            QueryField::OriginTrialDesktopStart => {
                FieldBinding::joined(Property::DesktopFirst, ORIGIN_TRIAL_STAGES)
            }
            QueryField::OriginTrialDesktopEnd => {
                FieldBinding::joined(Property::DesktopLast, ORIGIN_TRIAL_STAGES)
            }
            QueryField::OriginTrialAndroidStart => {
                FieldBinding::joined(Property::AndroidFirst, ORIGIN_TRIAL_STAGES)
            }
            QueryField::OriginTrialAndroidEnd => {
                FieldBinding::joined(Property::AndroidLast, ORIGIN_TRIAL_STAGES)
            }
            QueryField::DevTrialDesktopStart => {
                FieldBinding::joined(Property::DesktopFirst, DEV_TRIAL_STAGES)
            }
            QueryField::DevTrialAndroidStart => {
                FieldBinding::joined(Property::AndroidFirst, DEV_TRIAL_STAGES)
            }
            QueryField::RolloutMilestone => {
                FieldBinding::joined(Property::RolloutMilestone, ROLLOUT_STAGES)
            }
        }
    }
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_every_field_round_trips_by_name() {
        for field in QueryField::ALL {
            assert_eq!(QueryField::parse(field.name()), Some(*field));
        }
        let names: HashSet<&str> = QueryField::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names.len(), QueryField::ALL.len());
    }

    #[test]
    fn test_table_is_complete() {
        // A new variant must be added to ALL; this match breaks when it is not handled.
        let count = QueryField::ALL
            .iter()
            .filter(|field| match field {
                QueryField::Id
                | QueryField::Name
                | QueryField::Summary
                | QueryField::Category
                | QueryField::FeatureType
                | QueryField::ImplStatusChrome
                | QueryField::IntentStage
                | QueryField::StandardMaturity
                | QueryField::Owner
                | QueryField::Editor
                | QueryField::Cc
                | QueryField::Creator
                | QueryField::BlinkComponent
                | QueryField::CreatedWhen
                | QueryField::UpdatedWhen
                | QueryField::AccurateAsOf
                | QueryField::ShippingYear
                | QueryField::StarCount
                | QueryField::ChromeDesktop
                | QueryField::ChromeAndroid
                | QueryField::ChromeIos
                | QueryField::ChromeWebview
                | QueryField::OriginTrialDesktopStart
                | QueryField::OriginTrialDesktopEnd
                | QueryField::OriginTrialAndroidStart
                | QueryField::OriginTrialAndroidEnd
                | QueryField::DevTrialDesktopStart
                | QueryField::DevTrialAndroidStart
                | QueryField::RolloutMilestone => true,
            })
            .count();
        assert_eq!(count, 29);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(QueryField::parse("Category"), Some(QueryField::Category));
        assert_eq!(QueryField::parse("CREATED.WHEN"), Some(QueryField::CreatedWhen));
        assert_eq!(QueryField::parse("any"), None);
    }

    #[test]
    fn test_bindings_are_consistent() {
        for field in QueryField::ALL {
            let binding = field.binding();
            match binding.target {
                BindingTarget::Primary => {
                    assert_eq!(binding.collection(), Collection::Feature, "{}", field)
                }
                BindingTarget::Joined { stage_types } => {
                    assert_eq!(binding.collection(), Collection::Stage, "{}", field);
                    assert!(!stage_types.is_empty(), "{}", field);
                }
            }
            if binding.enum_kind.is_some() {
                assert_eq!(binding.property.kind(), crate::types::ValueKind::Int);
            }
        }
    }

    #[test]
    fn test_unindexed_fields() {
        let unindexed: Vec<QueryField> = QueryField::ALL
            .iter()
            .copied()
            .filter(|f| !f.binding().indexed)
            .collect();
        assert_eq!(unindexed, vec![QueryField::Name, QueryField::Summary]);
    }
}
