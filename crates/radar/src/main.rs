//! Radar query runner.
//!
//! Loads a JSON feature fixture into the in-memory store, runs one query and
//! prints the result page as JSON.

mod config;

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::{debug, info};

use config::CliConfig;
use radar_search::backends::memory::{MemoryCache, MemoryStore};
use radar_search::{
    FeatureSearch, Identity, QueryContext, SearchConfig, SearchRequest, StaticPermissions,
    VisibilityFlags,
};

/// Installs the global subscriber; `RUST_LOG` overrides the configured level.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("radar_search={0},radar={0}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn create_permissions(config: &CliConfig) -> StaticPermissions {
    let Some(caller) = &config.caller else {
        return StaticPermissions::new();
    };
    let permissions =
        StaticPermissions::new().with_approver(caller.clone(), config.caller_gate_types.clone());
    if config.caller_sees_unlisted {
        permissions.with_unlisted_viewer(caller.clone())
    } else {
        permissions
    }
}

/// Wires the store, the caller's permissions and a result cache living for
/// `search_config.cache_ttl`.
fn create_search(
    store: MemoryStore,
    config: &CliConfig,
    search_config: SearchConfig,
) -> FeatureSearch {
    let cache = MemoryCache::new(search_config.cache_ttl);
    FeatureSearch::new(Arc::new(store), Arc::new(create_permissions(config)))
        .with_cache(Arc::new(cache))
        .with_config(search_config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let search_config = SearchConfig::from_env();
    if let Err(errors) = search_config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let fixture = std::fs::read_to_string(&config.fixture)
        .with_context(|| format!("reading fixture {}", config.fixture.display()))?;
    let store = MemoryStore::from_json(&fixture)
        .with_context(|| format!("loading fixture {}", config.fixture.display()))?;
    info!(
        fixture = %config.fixture.display(),
        features = store.len(),
        "Loaded fixture"
    );

    let search = create_search(store, &config, search_config);

    let request = SearchRequest::from_params(
        config.query.clone(),
        config.sort.as_deref(),
        config.start.as_deref(),
        config.num.as_deref(),
    )?
    .with_flags(VisibilityFlags {
        show_unlisted: config.show_unlisted,
        show_deleted: config.show_deleted,
        show_enterprise: config.show_enterprise,
    })
    .with_names_only(config.names_only);

    let mut ctx = QueryContext::new(config.now.unwrap_or_else(Utc::now), config.current_stable);
    if let Some(caller) = &config.caller {
        ctx = ctx.with_caller(Identity::new(caller.clone()));
    }
    debug!(query = %request.query, anonymous = ctx.is_anonymous(), "Running query");

    let page = search.process_query(&request, &ctx).await?;
    println!("{}", serde_json::to_string_pretty(&page)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const SAMPLE: &str = include_str!("../fixtures/sample.json");

    fn create_sample_search(config: &CliConfig) -> FeatureSearch {
        let store = MemoryStore::from_json(SAMPLE).unwrap();
        create_search(store, config, SearchConfig::default())
    }

    fn create_context(caller: Option<&str>) -> QueryContext {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let ctx = QueryContext::new(now, 125);
        match caller {
            Some(email) => ctx.with_caller(Identity::new(email)),
            None => ctx,
        }
    }

    #[tokio::test]
    async fn test_sample_fixture_default_listing() {
        let config = CliConfig::parse_from(["radar", "-f", "sample.json"]);
        let page = create_sample_search(&config)
            .process_query(&SearchRequest::new(""), &create_context(None))
            .await
            .unwrap();
        assert_eq!(page.ids(), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_sample_fixture_caller_permissions() {
        let config = CliConfig::parse_from([
            "radar",
            "-f",
            "sample.json",
            "--caller",
            "security-owner@example.com",
            "--caller-gate-types",
            "4",
            "--caller-sees-unlisted",
        ]);
        let search = create_sample_search(&config);
        let ctx = create_context(config.caller.as_deref());

        let page = search
            .process_query(&SearchRequest::new("owner:me"), &ctx)
            .await
            .unwrap();
        assert_eq!(page.ids(), vec![3, 2]);

        let page = search
            .process_query(&SearchRequest::new("pending-approval-by:me"), &ctx)
            .await
            .unwrap();
        assert_eq!(page.ids(), vec![1]);
    }

    #[tokio::test]
    async fn test_sample_fixture_milestone_query() {
        let config = CliConfig::parse_from(["radar", "-f", "sample.json"]);
        let page = create_sample_search(&config)
            .process_query(
                &SearchRequest::new("browsers.chrome.desktop=current_stable"),
                &create_context(None),
            )
            .await
            .unwrap();
        assert_eq!(page.ids(), vec![1]);
    }

    #[tokio::test]
    async fn test_cacheable_request_is_served_from_cache() {
        let config = CliConfig::parse_from(["radar", "-f", "sample.json", "--show-unlisted"]);
        let store = MemoryStore::from_json(SAMPLE).unwrap();
        let search = create_search(store.clone(), &config, SearchConfig::default());
        let request = SearchRequest::new("category=Security").with_flags(VisibilityFlags {
            show_unlisted: true,
            ..VisibilityFlags::default()
        });

        let first = search
            .process_query(&request, &create_context(None))
            .await
            .unwrap();
        assert_eq!(first.ids(), vec![2]);

        let late: radar_search::types::FeatureRecord = serde_json::from_str(
            r#"{"id": 9, "name": "Late", "category": 2,
                "created": "2024-05-30T00:00:00Z", "updated": "2024-05-30T00:00:00Z"}"#,
        )
        .unwrap();
        store.insert_feature(late);

        let second = search
            .process_query(&request, &create_context(None))
            .await
            .unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_create_search_uses_configured_ttl() {
        let config = CliConfig::parse_from(["radar", "-f", "sample.json"]);
        let search_config =
            SearchConfig::default().with_cache_ttl(std::time::Duration::from_secs(5));
        let search = create_search(MemoryStore::new(), &config, search_config);
        assert_eq!(search.config().cache_ttl, std::time::Duration::from_secs(5));
    }
}
