//! Stored and query-side value types.
//!
//! [`FieldValue`] is what a record carries for a property and what a store
//! filter compares against. [`ParsedValue`] is what the value coercer produces
//! from a query literal before it is bound to a concrete property.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A typed property value held by a record or used as a filter operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Integer, milestone, id or enum code.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Point in time.
    DateTime(DateTime<Utc>),
    /// Boolean flag.
    Bool(bool),
    /// Text value.
    Text(String),
}

impl FieldValue {
    /// Compares two values of compatible types.
    ///
    /// Integers and floats compare numerically with each other. Values of
    /// unrelated types are incomparable, so a filter against a mistyped operand
    /// matches nothing.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => Some(a.cmp(b)),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.partial_cmp(b),
            (FieldValue::Int(a), FieldValue::Float(b)) => (*a as f64).partial_cmp(b),
            (FieldValue::Float(a), FieldValue::Int(b)) => a.partial_cmp(&(*b as f64)),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => Some(a.cmp(b)),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a.cmp(b)),
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Text(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::DateTime(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

/// A query literal after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue {
    /// Integer literal (milestones resolve to this).
    Int(i64),
    /// Floating point literal.
    Float(f64),
    /// Absolute or relative date.
    DateTime(DateTime<Utc>),
    /// Enumerated code resolved from a display name.
    EnumCode(i64),
    /// Anything else, compared verbatim.
    StringLiteral(String),
    /// Inclusive range `lo..hi`.
    Interval(Box<ParsedValue>, Box<ParsedValue>),
}

impl ParsedValue {
    /// Builds an interval from two scalar bounds.
    pub fn interval(lo: ParsedValue, hi: ParsedValue) -> Self {
        ParsedValue::Interval(Box::new(lo), Box::new(hi))
    }

    /// Returns `true` for a range value.
    pub fn is_interval(&self) -> bool {
        matches!(self, ParsedValue::Interval(..))
    }

    /// Converts a scalar into the operand a store filter compares with.
    ///
    /// Returns `None` for intervals, which expand into two filters instead.
    pub fn to_field_value(&self) -> Option<FieldValue> {
        match self {
            ParsedValue::Int(v) | ParsedValue::EnumCode(v) => Some(FieldValue::Int(*v)),
            ParsedValue::Float(v) => Some(FieldValue::Float(*v)),
            ParsedValue::DateTime(v) => Some(FieldValue::DateTime(*v)),
            ParsedValue::StringLiteral(v) => Some(FieldValue::Text(v.clone())),
            ParsedValue::Interval(..) => None,
        }
    }
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedValue::Int(v) | ParsedValue::EnumCode(v) => write!(f, "{}", v),
            ParsedValue::Float(v) => write!(f, "{}", v),
            ParsedValue::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            ParsedValue::StringLiteral(v) => write!(f, "{:?}", v),
            ParsedValue::Interval(lo, hi) => write!(f, "{}..{}", lo, hi),
        }
    }
}
