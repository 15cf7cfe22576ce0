//! Value coercion.
//!
//! Turns the raw value text of a field term into typed values. Precedence:
//!
//! 1. `lo..hi` (exactly one `..`) becomes an interval of two coerced scalars
//! 2. `a,b,c` becomes a list of independently coerced scalars (quick-OR)
//! 3. a scalar is tried as a relative date (`now`, `now-7d`, `now+2w`), an
//!    ISO date (`2024-1-31`), a relative milestone (`current_stable`,
//!    `current_stable-1`), and otherwise kept as a string literal
//!
//! Enum names and plain numbers stay string literals here; the resolver
//! narrows them once it knows which property the value is compared with.
//! Arithmetic that would overflow leaves the literal as a string.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;

use crate::caller::QueryContext;
use crate::types::ParsedValue;

static RELATIVE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^now(?:(?P<sign>[+-])(?P<amount>\d+)(?P<unit>[dw]))?$")
        .expect("relative date pattern is valid")
});

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<year>\d{4})-(?P<month>\d{1,2})-(?P<day>\d{1,2})$")
        .expect("date pattern is valid")
});

static RELATIVE_MILESTONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^current_stable(?:(?P<sign>[+-])(?P<amount>\d+))?$")
        .expect("milestone pattern is valid")
});

/// Coerces a raw term value.
///
/// Returns one value for a scalar or an interval, and one value per item for
/// a comma-separated list.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use radar_search::caller::QueryContext;
/// use radar_search::search::coercer::coerce;
/// use radar_search::types::ParsedValue;
///
/// let ctx = QueryContext::new(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(), 124);
/// assert_eq!(coerce("current_stable+1", &ctx), vec![ParsedValue::Int(125)]);
/// assert_eq!(coerce("a,b", &ctx).len(), 2);
/// assert!(coerce("120..current_stable", &ctx)[0].is_interval());
/// ```
pub fn coerce(raw: &str, ctx: &QueryContext) -> Vec<ParsedValue> {
    if raw.matches("..").count() == 1
        && let Some((lo, hi)) = raw.split_once("..")
    {
        return vec![coerce_interval(raw, lo, hi, ctx)];
    }

    let items = split_list(raw);
    match items.len() {
        0 => vec![ParsedValue::StringLiteral(String::new())],
        1 => vec![coerce_scalar(&items[0], ctx)],
        _ => items.iter().map(|item| coerce_scalar(item, ctx)).collect(),
    }
}

fn coerce_interval(raw: &str, lo: &str, hi: &str, ctx: &QueryContext) -> ParsedValue {
    let lo = unquote(lo.trim());
    let hi = unquote(hi.trim());
    if lo.is_empty() || hi.is_empty() {
        return ParsedValue::StringLiteral(unquote(raw).to_string());
    }
    ParsedValue::interval(coerce_scalar(lo, ctx), coerce_scalar(hi, ctx))
}

/// Coerces a single unquoted literal.
pub fn coerce_scalar(raw: &str, ctx: &QueryContext) -> ParsedValue {
    let literal = unquote(raw.trim());

    if let Some(caps) = RELATIVE_DATE.captures(literal) {
        let shifted = match (caps.name("sign"), caps.name("amount"), caps.name("unit")) {
            (Some(sign), Some(amount), Some(unit)) => {
                relative_duration(amount.as_str(), unit.as_str()).and_then(|offset| {
                    if sign.as_str() == "-" {
                        ctx.now().checked_sub_signed(offset)
                    } else {
                        ctx.now().checked_add_signed(offset)
                    }
                })
            }
            _ => Some(ctx.now()),
        };
        return shifted.map_or_else(
            || ParsedValue::StringLiteral(literal.to_string()),
            ParsedValue::DateTime,
        );
    }

    if let Some(caps) = ISO_DATE.captures(literal) {
        let date = (|| {
            let year = caps.name("year")?.as_str().parse().ok()?;
            let month = caps.name("month")?.as_str().parse().ok()?;
            let day = caps.name("day")?.as_str().parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
        })();
        return date.map_or_else(
            || ParsedValue::StringLiteral(literal.to_string()),
            |midnight| ParsedValue::DateTime(midnight.and_utc()),
        );
    }

    if let Some(caps) = RELATIVE_MILESTONE.captures(literal) {
        let base = ctx.current_stable_milestone();
        let milestone = match (caps.name("sign"), caps.name("amount")) {
            (Some(sign), Some(amount)) => amount.as_str().parse::<i64>().ok().and_then(|n| {
                if sign.as_str() == "-" {
                    base.checked_sub(n)
                } else {
                    base.checked_add(n)
                }
            }),
            _ => Some(base),
        };
        return milestone.map_or_else(
            || ParsedValue::StringLiteral(literal.to_string()),
            ParsedValue::Int,
        );
    }

    ParsedValue::StringLiteral(literal.to_string())
}

fn relative_duration(amount: &str, unit: &str) -> Option<Duration> {
    let amount: i64 = amount.parse().ok()?;
    let days = match unit {
        "w" => amount.checked_mul(7)?,
        _ => amount,
    };
    Duration::try_days(days)
}

/// Returns `true` for literals whose meaning depends on the query context.
///
/// Used to keep results of queries like `created.when>now-7d` out of the
/// shared cache.
pub fn is_relative_literal(raw: &str) -> bool {
    let literal = unquote(raw.trim());
    RELATIVE_DATE.is_match(literal) || RELATIVE_MILESTONE.is_match(literal)
}

/// Splits a comma-separated value, ignoring commas inside double quotes.
///
/// Items are trimmed and unquoted; empty items are dropped.
pub fn split_list(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in raw.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    items.push(current);

    items
        .iter()
        .map(|item| unquote(item.trim()).to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
}
