//! Engine configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RADAR_RECENT_REVIEW_DAYS` | 30 | Window for `is:recently-reviewed` |
//! | `RADAR_CACHE_TTL` | 1h | Lifetime of cached result pages |
//! | `RADAR_CACHE_KEY_PREFIX` | featuresearch | Namespace of cache keys |
//! | `RADAR_DEFAULT_SORT` | -created.when | Sort spec used when a request has none |
//!
//! # Example
//!
//! ```
//! use radar_search::SearchConfig;
//!
//! let config = SearchConfig {
//!     recent_review_days: 7,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::SortSpec;

/// Configuration of the query pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Days before `now` within which a resolved gate counts as recently reviewed.
    pub recent_review_days: i64,

    /// Lifetime of cached result pages.
    #[serde(with = "humantime_serde_compat")]
    pub cache_ttl: Duration,

    /// Prefix of every cache key.
    pub cache_key_prefix: String,

    /// Sort spec applied when a request does not name one.
    pub default_sort: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            recent_review_days: 30,
            cache_ttl: Duration::from_secs(60 * 60),
            cache_key_prefix: "featuresearch".to_string(),
            default_sort: "-created.when".to_string(),
        }
    }
}

impl SearchConfig {
    /// Builds a configuration from `RADAR_*` environment variables.
    ///
    /// Missing or unparsable variables keep their default value.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(days) = env_var("RADAR_RECENT_REVIEW_DAYS").and_then(|v| v.parse().ok()) {
            config.recent_review_days = days;
        }
        if let Some(ttl) =
            env_var("RADAR_CACHE_TTL").and_then(|v| humantime::parse_duration(&v).ok())
        {
            config.cache_ttl = ttl;
        }
        if let Some(prefix) = env_var("RADAR_CACHE_KEY_PREFIX") {
            config.cache_key_prefix = prefix;
        }
        if let Some(sort) = env_var("RADAR_DEFAULT_SORT") {
            config.default_sort = sort;
        }
        config
    }

    /// Sets the recently-reviewed window.
    pub fn with_recent_review_days(mut self, days: i64) -> Self {
        self.recent_review_days = days;
        self
    }

    /// Sets the cache entry lifetime.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// The parsed default sort spec.
    pub fn default_sort_spec(&self) -> SortSpec {
        SortSpec::parse(&self.default_sort)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.recent_review_days <= 0 {
            errors.push("recent_review_days must be positive".to_string());
        }
        if self.cache_ttl.is_zero() {
            errors.push("cache_ttl must be greater than zero".to_string());
        }
        if self.cache_key_prefix.is_empty() {
            errors.push("cache_key_prefix cannot be empty".to_string());
        }
        if self.default_sort_spec().key.is_empty() {
            errors.push("default_sort must name a sort key".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Serializes a `Duration` as a humantime string such as `"1h"` or `"90s"`.
mod humantime_serde_compat {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(D::Error::custom)
    }
}
