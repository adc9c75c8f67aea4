use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use area_weather::{AppConfig, telemetry, web};

#[derive(Parser)]
#[command(
    name = "area-weather",
    version,
    about = "Serve today's weather for named areas over HTTP"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Listen address, overrides server.listen_addr
    #[arg(short, long)]
    listen: Option<String>,
    /// Area code table, overrides areas.table_path
    #[arg(short, long)]
    areas: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load_from_path(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen;
    }
    if let Some(areas) = cli.areas {
        config.areas.table_path = areas;
    }
    config.validate().context("Invalid configuration")?;

    telemetry::init(&config.logging)?;
    tracing::info!(
        table = %config.areas.table_path.display(),
        provider = %config.provider.base_url,
        "Starting area weather service"
    );

    web::run(&config).await
}
