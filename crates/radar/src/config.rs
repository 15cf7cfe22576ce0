//! Command-line configuration for the `radar` runner.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RADAR_FIXTURE` | (required) | JSON file with features, stages, gates and stars |
//! | `RADAR_SORT` | config default | Sort spec, e.g. `-created.when` |
//! | `RADAR_START` | 0 | Results to skip |
//! | `RADAR_NUM` | unlimited | Results to return |
//! | `RADAR_CALLER` | anonymous | Caller email for `owner:me` and friends |
//! | `RADAR_CALLER_GATE_TYPES` | none | Gate types the caller may approve |
//! | `RADAR_CALLER_SEES_UNLISTED` | false | Caller may view unlisted features |
//! | `RADAR_CURRENT_STABLE` | 124 | Milestone `current_stable` refers to |
//! | `RADAR_NOW` | system clock | RFC 3339 instant relative dates are computed from |
//! | `RADAR_LOG_LEVEL` | warn | Log level |
//!
//! Pipeline settings (`RADAR_RECENT_REVIEW_DAYS`, `RADAR_DEFAULT_SORT`, ...)
//! are read by [`radar_search::SearchConfig::from_env`].

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;

/// Runs one feature query against a JSON fixture and prints the page.
#[derive(Debug, Clone, Parser)]
#[command(name = "radar")]
#[command(about = "Query a feature fixture with the Radar query language")]
pub struct CliConfig {
    /// Query text, e.g. `category=CSS -owner:me`.
    #[arg(default_value = "")]
    pub query: String,

    /// Fixture file.
    #[arg(short, long, env = "RADAR_FIXTURE")]
    pub fixture: PathBuf,

    /// Sort spec.
    #[arg(short, long, env = "RADAR_SORT")]
    pub sort: Option<String>,

    /// Number of results to skip.
    #[arg(long, env = "RADAR_START", allow_hyphen_values = true)]
    pub start: Option<String>,

    /// Maximum number of results.
    #[arg(long, env = "RADAR_NUM", allow_hyphen_values = true)]
    pub num: Option<String>,

    /// Include unlisted features.
    #[arg(long)]
    pub show_unlisted: bool,

    /// Include deleted features.
    #[arg(long)]
    pub show_deleted: bool,

    /// Include enterprise features.
    #[arg(long)]
    pub show_enterprise: bool,

    /// Return only ids and names.
    #[arg(long)]
    pub names_only: bool,

    /// Email of the signed-in caller.
    #[arg(long, env = "RADAR_CALLER")]
    pub caller: Option<String>,

    /// Gate types the caller may approve (comma-separated).
    #[arg(long, env = "RADAR_CALLER_GATE_TYPES", value_delimiter = ',')]
    pub caller_gate_types: Vec<i64>,

    /// The caller may view unlisted features.
    #[arg(long, env = "RADAR_CALLER_SEES_UNLISTED")]
    pub caller_sees_unlisted: bool,

    /// Current stable milestone.
    #[arg(long, env = "RADAR_CURRENT_STABLE", default_value = "124")]
    pub current_stable: i64,

    /// Evaluation instant (RFC 3339); defaults to now.
    #[arg(long, env = "RADAR_NOW")]
    pub now: Option<DateTime<Utc>>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "RADAR_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl CliConfig {
    /// Validates settings that clap cannot check.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.current_stable <= 0 {
            errors.push("current_stable must be positive".to_string());
        }
        if self.caller.is_none() && (self.caller_sees_unlisted || !self.caller_gate_types.is_empty()) {
            errors.push("caller permissions require --caller".to_string());
        }
        if !["error", "warn", "info", "debug", "trace"].contains(&self.log_level.as_str()) {
            errors.push(format!("unknown log level: {}", self.log_level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
