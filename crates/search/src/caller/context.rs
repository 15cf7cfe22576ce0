//! Per-request query context.

use chrono::{DateTime, Utc};

use super::identity::Identity;

/// Explicit inputs every query is evaluated against.
///
/// Relative literals (`now-7d`, `current_stable+1`) and identity-bound
/// pseudo-fields read from this context rather than from ambient state, so
/// the same query and context always produce the same result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    now: DateTime<Utc>,
    current_stable_milestone: i64,
    caller: Option<Identity>,
}

impl QueryContext {
    /// Creates an anonymous context.
    pub fn new(now: DateTime<Utc>, current_stable_milestone: i64) -> Self {
        Self {
            now,
            current_stable_milestone,
            caller: None,
        }
    }

    /// Sets the signed-in caller.
    pub fn with_caller(mut self, caller: Identity) -> Self {
        self.caller = Some(caller);
        self
    }

    /// The instant relative dates are computed from.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// The milestone `current_stable` refers to.
    pub fn current_stable_milestone(&self) -> i64 {
        self.current_stable_milestone
    }

    /// The signed-in caller, if any.
    pub fn caller(&self) -> Option<&Identity> {
        self.caller.as_ref()
    }

    /// Returns `true` if no one is signed in.
    pub fn is_anonymous(&self) -> bool {
        self.caller.is_none()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_context_accessors() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let ctx = QueryContext::new(now, 124);
        assert!(ctx.is_anonymous());
        assert_eq!(ctx.now(), now);
        assert_eq!(ctx.current_stable_milestone(), 124);

        let ctx = ctx.with_caller(Identity::new("a@example.com"));
        assert_eq!(ctx.caller().map(Identity::email), Some("a@example.com"));
    }
}
