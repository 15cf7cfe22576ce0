//! Field and free-text term resolution.
//!
//! Each term becomes a [`Deferred`] set of feature ids: either an answer
//! known at dispatch time (unknown or unindexed fields) or a boxed lookup
//! future that the combinator runs concurrently with its siblings. Lookup
//! failures are logged and resolve to an empty set.

use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, warn};

use super::bindings::{BindingTarget, FieldBinding, QueryField};
use super::coercer::coerce;
use crate::caller::QueryContext;
use crate::core::{FeatureStore, StoreQuery};
use crate::types::{
    Cardinality, Collection, FeatureId, FieldValue, Filter, Operator, ParsedValue, Property,
    ValueKind,
};

/// A resolved term: the matching feature ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    /// Matching feature ids.
    pub ids: BTreeSet<FeatureId>,
    /// The lookup already applied the term's negation.
    pub complemented: bool,
}

impl Resolved {
    /// A set that matches nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A plain (not complemented) set.
    pub fn of(ids: impl IntoIterator<Item = FeatureId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
            complemented: false,
        }
    }
}

/// A lookup in flight.
pub type LookupFuture = Pin<Box<dyn Future<Output = Resolved> + Send + 'static>>;

/// The deferred result of resolving one term.
pub enum Deferred {
    /// Known without a lookup.
    Ready(Resolved),
    /// Needs a store lookup.
    Pending(LookupFuture),
}

impl Deferred {
    /// A term that matches nothing.
    pub fn empty() -> Self {
        Deferred::Ready(Resolved::empty())
    }

    /// Waits for the result in place.
    pub async fn resolve(self) -> Resolved {
        match self {
            Deferred::Ready(resolved) => resolved,
            Deferred::Pending(lookup) => lookup.await,
        }
    }
}

impl std::fmt::Debug for Deferred {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Deferred::Ready(resolved) => f.debug_tuple("Ready").field(resolved).finish(),
            Deferred::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// Builds a lookup that unions the results of `queries`.
///
/// Any store error makes the whole term resolve to an empty set.
pub(crate) fn lookup(
    store: Arc<dyn FeatureStore>,
    queries: Vec<StoreQuery>,
    complemented: bool,
    label: String,
) -> Deferred {
    Deferred::Pending(Box::pin(async move {
        let mut ids = BTreeSet::new();
        for query in &queries {
            match store.fetch_ids(query).await {
                Ok(found) => ids.extend(found),
                Err(e) => {
                    warn!(
                        term = %label,
                        backend = store.backend_name(),
                        error = %e,
                        "Term lookup failed, treating it as matching nothing"
                    );
                    return Resolved::empty();
                }
            }
        }
        Resolved { ids, complemented }
    }))
}

/// The store queries a field term expands to.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupPlan {
    /// Queries whose results are unioned.
    pub queries: Vec<StoreQuery>,
    /// The plan selects the complement of the term's own match set.
    pub complemented: bool,
}

/// Resolves field and free-text terms against a [`FeatureStore`].
#[derive(Clone)]
pub struct FieldResolver {
    store: Arc<dyn FeatureStore>,
}

impl FieldResolver {
    /// Creates a resolver over `store`.
    pub fn new(store: Arc<dyn FeatureStore>) -> Self {
        Self { store }
    }

    /// Resolves `field<operator>raw_value`.
    ///
    /// With `negated` set the resolver may return the complemented set
    /// directly (see [`plan`]); otherwise negation is left to the combinator.
    pub fn resolve_field(
        &self,
        field: &str,
        operator: Operator,
        raw_value: &str,
        negated: bool,
        ctx: &QueryContext,
    ) -> Deferred {
        let Some(query_field) = QueryField::parse(field) else {
            warn!(field = %field, "Unknown query field");
            return Deferred::empty();
        };

        let binding = query_field.binding();
        if !binding.indexed {
            warn!(field = %query_field, "Query field is not indexed");
            return Deferred::empty();
        }

        let values: Vec<ParsedValue> = coerce(raw_value, ctx)
            .into_iter()
            .map(|value| bind_value(value, &binding))
            .collect();
        let plan = plan(&binding, operator, &values, negated);

        debug!(
            field = %query_field,
            operator = %operator,
            values = values.len(),
            queries = plan.queries.len(),
            complemented = plan.complemented,
            "Dispatching field lookup"
        );

        let label = format!("{}{}{}", query_field, operator, raw_value);
        lookup(
            Arc::clone(&self.store),
            plan.queries,
            plan.complemented,
            label,
        )
    }

    /// Resolves a free-text term through the store's text index.
    pub fn resolve_text(&self, text: &str) -> Deferred {
        let store = Arc::clone(&self.store);
        let text = text.to_string();
        debug!(text = %text, "Dispatching text lookup");

        Deferred::Pending(Box::pin(async move {
            match store.search_text(&text).await {
                Ok(ids) => Resolved::of(ids),
                Err(e) => {
                    warn!(
                        text = %text,
                        backend = store.backend_name(),
                        error = %e,
                        "Text lookup failed, treating it as matching nothing"
                    );
                    Resolved::empty()
                }
            }
        }))
    }
}

/// Expands a bound field term into store queries.
///
/// A negated term is answered with the complementary operator when that is
/// exactly the set difference against all features: a primary, indexed
/// property every feature carries exactly once, compared with one scalar of
/// the property's own type. Everything else is planned un-negated.
pub fn plan(
    binding: &FieldBinding,
    operator: Operator,
    values: &[ParsedValue],
    negated: bool,
) -> LookupPlan {
    let complemented = negated && can_complement(binding, values);
    let operator = if complemented {
        operator.complement()
    } else {
        operator
    };

    let base = match binding.target {
        BindingTarget::Primary => StoreQuery::new(Collection::Feature),
        BindingTarget::Joined { stage_types } => StoreQuery::new(Collection::Stage).filter(
            Filter::one_of(Property::StageType, stage_types.iter().copied()),
        ),
    };
    let property = binding.property;

    let queries = match values {
        [ParsedValue::Interval(lo, hi)] => match (lo.to_field_value(), hi.to_field_value()) {
            (Some(lo), Some(hi)) => vec![
                base.filter(Filter::compare(property, Operator::Ge, lo))
                    .filter(Filter::compare(property, Operator::Le, hi)),
            ],
            _ => Vec::new(),
        },
        [single] => match single.to_field_value() {
            Some(value) => vec![base.filter(Filter::compare(property, operator, value))],
            None => Vec::new(),
        },
        many if operator == Operator::Eq => {
            let operands: Vec<FieldValue> =
                many.iter().filter_map(ParsedValue::to_field_value).collect();
            vec![base.filter(Filter::one_of(property, operands))]
        }
        many => many
            .iter()
            .filter_map(ParsedValue::to_field_value)
            .map(|value| {
                base.clone()
                    .filter(Filter::compare(property, operator, value))
            })
            .collect(),
    };

    LookupPlan {
        queries,
        complemented,
    }
}

fn can_complement(binding: &FieldBinding, values: &[ParsedValue]) -> bool {
    let [value] = values else {
        return false;
    };
    binding.target == BindingTarget::Primary
        && binding.indexed
        && binding.property.cardinality() == Cardinality::Required
        && value
            .to_field_value()
            .is_some_and(|v| value_kind(&v) == binding.property.kind())
}

fn value_kind(value: &FieldValue) -> ValueKind {
    match value {
        FieldValue::Int(_) => ValueKind::Int,
        FieldValue::Float(_) => ValueKind::Float,
        FieldValue::DateTime(_) => ValueKind::DateTime,
        FieldValue::Bool(_) => ValueKind::Bool,
        FieldValue::Text(_) => ValueKind::Text,
    }
}

/// Narrows a coerced value to the property it is compared with.
///
/// Enum fields resolve display names to codes and numeric properties parse
/// numbers. A literal that does not fit stays a string and matches nothing.
pub fn bind_value(value: ParsedValue, binding: &FieldBinding) -> ParsedValue {
    match value {
        ParsedValue::Interval(lo, hi) => {
            ParsedValue::interval(bind_value(*lo, binding), bind_value(*hi, binding))
        }
        ParsedValue::StringLiteral(literal) => {
            if let Some(kind) = binding.enum_kind {
                return match kind.lookup(&literal) {
                    Some(code) => ParsedValue::EnumCode(code),
                    None => ParsedValue::StringLiteral(literal),
                };
            }
            match binding.property.kind() {
                ValueKind::Int => literal
                    .parse::<i64>()
                    .map(ParsedValue::Int)
                    .or_else(|_| literal.parse::<f64>().map(ParsedValue::Float))
                    .unwrap_or(ParsedValue::StringLiteral(literal)),
                ValueKind::Float => literal
                    .parse::<f64>()
                    .map(ParsedValue::Float)
                    .unwrap_or(ParsedValue::StringLiteral(literal)),
                _ => ParsedValue::StringLiteral(literal),
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::Condition;
    use crate::types::enums::{category, stage_type};

    fn binding(field: &str) -> FieldBinding {
        QueryField::parse(field).unwrap().binding()
    }

    fn string(s: &str) -> ParsedValue {
        ParsedValue::StringLiteral(s.to_string())
    }

    // ============================================================================
    // Binding Tests
    // ============================================================================

    #[test]
    fn test_bind_enum_name() {
        assert_eq!(
            bind_value(string("Web Components"), &binding("category")),
            ParsedValue::EnumCode(category::WEB_COMPONENTS)
        );
        assert_eq!(
            bind_value(string("Nonsense"), &binding("category")),
            string("Nonsense")
        );
    }

    #[test]
    fn test_bind_numbers() {
        assert_eq!(
            bind_value(string("120"), &binding("browsers.chrome.desktop")),
            ParsedValue::Int(120)
        );
        assert_eq!(
            bind_value(string("abc"), &binding("star_count")),
            string("abc")
        );
        assert_eq!(
            bind_value(string("a@example.com"), &binding("owner")),
            string("a@example.com")
        );
    }

    #[test]
    fn test_bind_interval_bounds() {
        let bound = bind_value(
            ParsedValue::interval(string("100"), string("110")),
            &binding("browsers.chrome.android"),
        );
        assert_eq!(
            bound,
            ParsedValue::interval(ParsedValue::Int(100), ParsedValue::Int(110))
        );
    }

    // ============================================================================
    // Plan Tests
    // ============================================================================

    #[test]
    fn test_plan_single_primary() {
        let plan = plan(
            &binding("category"),
            Operator::Eq,
            &[ParsedValue::EnumCode(1)],
            false,
        );
        assert!(!plan.complemented);
        assert_eq!(plan.queries.len(), 1);
        assert_eq!(plan.queries[0].collection, Collection::Feature);
        assert_eq!(
            plan.queries[0].filters,
            vec![Filter::compare(Property::Category, Operator::Eq, 1)]
        );
    }

    #[test]
    fn test_plan_list_becomes_membership() {
        let plan = plan(
            &binding("category"),
            Operator::Eq,
            &[ParsedValue::EnumCode(0), ParsedValue::EnumCode(2)],
            false,
        );
        assert_eq!(plan.queries.len(), 1);
        assert_eq!(
            plan.queries[0].filters[0].condition,
            Condition::In(vec![FieldValue::Int(0), FieldValue::Int(2)])
        );
    }

    #[test]
    fn test_plan_list_with_comparison_unions_queries() {
        let plan = plan(
            &binding("star_count"),
            Operator::Gt,
            &[ParsedValue::Int(1), ParsedValue::Int(5)],
            false,
        );
        assert_eq!(plan.queries.len(), 2);
    }

    #[test]
    fn test_plan_interval_has_two_bounds() {
        let lo = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let hi = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        let plan = plan(
            &binding("created.when"),
            Operator::Eq,
            &[ParsedValue::interval(
                ParsedValue::DateTime(lo),
                ParsedValue::DateTime(hi),
            )],
            false,
        );
        assert_eq!(
            plan.queries[0].filters,
            vec![
                Filter::compare(Property::Created, Operator::Ge, lo),
                Filter::compare(Property::Created, Operator::Le, hi),
            ]
        );
    }

    #[test]
    fn test_plan_joined_restricts_stage_types() {
        let plan = plan(
            &binding("browsers.chrome.desktop"),
            Operator::Ge,
            &[ParsedValue::Int(120)],
            true,
        );
        assert!(!plan.complemented);
        let query = &plan.queries[0];
        assert_eq!(query.collection, Collection::Stage);
        assert_eq!(
            query.filters[0],
            Filter::one_of(
                Property::StageType,
                stage_type::SHIPPING_STAGES.iter().copied()
            )
        );
        assert_eq!(
            query.filters[1],
            Filter::compare(Property::DesktopFirst, Operator::Ge, 120)
        );
    }

    // ============================================================================
    // Complement Tests
    // ============================================================================

    #[test]
    fn test_complement_on_required_scalar() {
        let plan = plan(
            &binding("category"),
            Operator::Lt,
            &[ParsedValue::EnumCode(3)],
            true,
        );
        assert!(plan.complemented);
        assert_eq!(
            plan.queries[0].filters,
            vec![Filter::compare(Property::Category, Operator::Ge, 3)]
        );
    }

    #[test]
    fn test_no_complement_for_repeated_optional_or_mismatched() {
        let owner = plan(&binding("owner"), Operator::Eq, &[string("a@x.com")], true);
        assert!(!owner.complemented);

        let year = plan(&binding("shipping_year"), Operator::Eq, &[ParsedValue::Int(2024)], true);
        assert!(!year.complemented);

        let mismatched = plan(&binding("category"), Operator::Eq, &[string("Nonsense")], true);
        assert!(!mismatched.complemented);

        let list = plan(
            &binding("category"),
            Operator::Eq,
            &[ParsedValue::EnumCode(0), ParsedValue::EnumCode(1)],
            true,
        );
        assert!(!list.complemented);
    }

    // ============================================================================
    // Dispatch Tests
    // ============================================================================

    #[tokio::test]
    async fn test_unknown_field_resolves_empty_immediately() {
        let store: Arc<dyn FeatureStore> = Arc::new(crate::backends::memory::MemoryStore::new());
        let resolver = FieldResolver::new(store);
        let ctx = QueryContext::new(Utc::now(), 120);

        let deferred = resolver.resolve_field("bogus", Operator::Eq, "x", false, &ctx);
        assert!(matches!(deferred, Deferred::Ready(_)));
        assert_eq!(deferred.resolve().await, Resolved::empty());

        let deferred = resolver.resolve_field("summary", Operator::Eq, "x", false, &ctx);
        assert!(matches!(deferred, Deferred::Ready(_)));
    }
}
