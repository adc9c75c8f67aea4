//! Tracing subscriber setup

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(env_directives.as_deref(), &config.level);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if is_json(&config.format) {
        builder.json().try_init()
    } else {
        builder.pretty().try_init()
    };

    result.map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}

/// Directives from the environment when they parse, otherwise the
/// configured level for this crate and the HTTP layer
fn build_filter(env_directives: Option<&str>, level: &str) -> EnvFilter {
    env_directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(format!("area_weather={level},tower_http={level}")))
}

fn is_json(format: &str) -> bool {
    format == "json"
}
