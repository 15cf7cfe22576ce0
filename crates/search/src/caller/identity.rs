//! Caller identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The signed-in user a query runs on behalf of.
///
/// Identity-bound pseudo-fields such as `owner:me` compare stored email
/// addresses against [`Identity::email`].
///
/// # Examples
///
/// ```
/// use radar_search::caller::Identity;
///
/// let me = Identity::new("Owner@Example.com");
/// assert_eq!(me.email(), "owner@example.com");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Creates an identity from an email address, lowercased.
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into().trim().to_lowercase())
    }

    /// The caller's email address.
    pub fn email(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_normalizes_email() {
        let identity = Identity::new("  User@Example.COM ");
        assert_eq!(identity.email(), "user@example.com");
        assert_eq!(identity, Identity::new("user@example.com"));
    }

    #[test]
    fn test_identity_serde_transparent() {
        let identity = Identity::new("a@example.com");
        let json = serde_json::to_string(&identity).unwrap();
        assert_eq!(json, "\"a@example.com\"");
    }
}
