//! Desktop entry point for PhotoMind.

use clap::Parser;
use std::path::PathBuf;

mod config;
mod logging;

#[derive(Parser)]
#[command(name = "photomind", author, version, about = "PhotoMind AI photo gallery")]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override log level (e.g. info, debug)
    #[arg(long)]
    log_level: Option<String>,
    /// Override the backend base URL
    #[arg(long)]
    api_base_url: Option<String>,
    /// Override number of thumbnails loaded up front
    #[arg(long)]
    thumbnails_preload: Option<usize>,
    /// Override number of concurrent thumbnail downloads
    #[arg(long)]
    preload_threads: Option<usize>,
}

#[cfg_attr(feature = "trace-spans", tracing::instrument)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let overrides = config::AppConfigOverrides {
        log_level: cli.log_level,
        api_base_url: cli.api_base_url,
        thumbnails_preload: cli.thumbnails_preload,
        preload_threads: cli.preload_threads,
        cache_path: None,
    };
    let cfg = config::AppConfig::load_from(cli.config).apply_overrides(&overrides);
    let _guard = logging::init(&cfg.log_level, &cfg.cache_path)?;

    tracing::info!("Starting PhotoMind, backend at {}", cfg.api_base_url);
    ui::run(ui::UiFlags {
        api_base_url: cfg.api_base_url,
        cache_dir: cfg.cache_path,
        thumbnails_preload: cfg.thumbnails_preload,
        preload_threads: cfg.preload_threads,
    })?;
    Ok(())
}
