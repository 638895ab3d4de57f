use api_client::{ApiClient, Photo};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ui::gallery;
use ui::ALL_PHOTOS;

#[path = "../config.rs"]
mod config;
#[path = "../logging.rs"]
mod logging;

#[derive(Parser)]
#[command(
    name = "photomind_cli",
    author,
    version,
    about = "PhotoMind command line client"
)]
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
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is up
    Health,
    /// List photos, optionally passing a query to the backend
    Search {
        query: Option<String>,
    },
    /// Resolve a natural language query into tags
    DeepSearch {
        query: String,
    },
    /// List the saved tabs
    Tabs,
    /// Create a new tab
    AddTab {
        /// Name of the new tab
        name: String,
    },
    /// Upload one or more images
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show the photos the gallery would display for a query or tab
    Filter {
        /// Free-text tag filter
        #[arg(long)]
        query: Option<String>,
        /// Tab whose name is resolved through deep search
        #[arg(long)]
        tab: Option<String>,
    },
}

fn print_photo(photo: &Photo) {
    let tags: Vec<String> = photo
        .tags
        .iter()
        .map(|t| format!("{} ({:.0}%)", t.name, t.confidence * 100.0))
        .collect();
    println!(
        "{}\t{}\t{}\t{}",
        photo.id,
        photo.display_name(),
        photo.date_modified,
        tags.join(", ")
    );
}

#[cfg_attr(feature = "trace-spans", tracing::instrument)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = config::AppConfigOverrides {
        log_level: cli.log_level.clone(),
        api_base_url: cli.api_base_url.clone(),
        ..Default::default()
    };
    let cfg = config::AppConfig::load_from(cli.config.clone()).apply_overrides(&overrides);
    let _guard = logging::init(&cfg.log_level, &cfg.cache_path)?;

    let client = ApiClient::with_base_url(cfg.api_base_url.clone());
    tracing::debug!("using backend {}", client.base_url());

    match cli.command {
        Commands::Health => {
            let health = client.health().await?;
            println!("Status: {}", health.status);
            if let Some(service) = health.service {
                println!("Service: {}", service);
            }
            if let Some(version) = health.version {
                println!("Version: {}", version);
            }
        }
        Commands::Search { query } => {
            let photos = client.search_images(query.as_deref().unwrap_or("")).await?;
            for photo in &photos {
                print_photo(photo);
            }
            println!("{} photos", photos.len());
        }
        Commands::DeepSearch { query } => {
            let hits = client.deep_search(&query).await?;
            if hits.is_empty() {
                println!("No tags found for {:?}", query);
            }
            for hit in hits {
                println!("{} ({:.2})", hit.tag, hit.confidence);
            }
        }
        Commands::Tabs => {
            let tabs = client.get_tabs().await?;
            println!("{}", ALL_PHOTOS);
            for tab in tabs {
                println!("{} (id: {})", tab.tab_name, tab.tab_id);
            }
        }
        Commands::AddTab { name } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err("tab name must not be blank".into());
            }
            let tab = client.add_tab(&name).await?;
            println!("Tab created: {} (id: {})", tab.tab_name, tab.tab_id);
        }
        Commands::Upload { files } => {
            let uploaded = client.upload_images(&files).await?;
            println!("Uploaded {} files", uploaded.len());
        }
        Commands::Filter { query, tab } => {
            let tags: Vec<String> = match tab.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() && name != ALL_PHOTOS => client
                    .deep_search(name)
                    .await?
                    .into_iter()
                    .map(|hit| hit.tag.to_lowercase())
                    .collect(),
                _ => Vec::new(),
            };
            let query = query.unwrap_or_default();
            let photos = client.search_images("").await?;
            let entries = gallery::filter_photos(&photos, &query, &tags);
            for entry in &entries {
                println!(
                    "{}\t{}\t{}",
                    entry.photo.id,
                    entry.photo.display_name(),
                    entry.matched_tag.as_deref().unwrap_or("-")
                );
            }
            println!("{} of {} photos", entries.len(), photos.len());
        }
    }

    Ok(())
}
