//! inbox - A line-oriented driver for the inbox engine
//!
//! Reads one intent per line from stdin and prints the resulting view.

use anyhow::{Context, Result};
use clap::Parser;
use inbox::{
    Inbox, InboxConfig, InMemoryOverrideStore, MailApiClient, OverrideStore, SessionOptions,
    SqliteOverrideStore,
};
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;

mod commands;
mod driver;
mod render;

use driver::Driver;
use render::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "inbox", version, about = "Browse a paginated remote inbox")]
struct Cli {
    /// Settings file (defaults to ~/.config/inbox/inbox.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print each view as a JSON line
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Mail API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Page to show first
    #[arg(long)]
    page: Option<u32>,

    /// Override database path
    #[arg(long, conflicts_with = "ephemeral")]
    database: Option<PathBuf>,

    /// Keep edits in memory only
    #[arg(long, default_value_t = false)]
    ephemeral: bool,

    /// Write the effective settings to the settings file, then start
    #[arg(long, default_value_t = false)]
    save_config: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let mut settings = InboxConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        settings.api_url = url;
    }
    if let Some(page) = cli.page {
        settings.start_page = page;
    }
    if let Some(path) = cli.database {
        settings.database_path = Some(path);
    }
    if cli.save_config {
        match &cli.config {
            Some(path) => {
                settings.save_to(path)?;
                info!("Saved settings to {}", path.display());
            }
            None => {
                settings.save()?;
                if let Some(path) = InboxConfig::default_config_path() {
                    info!("Saved settings to {}", path.display());
                }
            }
        }
    }

    let store: Arc<dyn OverrideStore> = if cli.ephemeral {
        info!("Keeping overrides in memory");
        Arc::new(InMemoryOverrideStore::new())
    } else {
        let path = settings
            .database_path()
            .context("No data directory for the override database; pass --database")?;
        info!("Opening override database at {}", path.display());
        Arc::new(SqliteOverrideStore::new(&path)?)
    };
    let source = Arc::new(MailApiClient::new(&settings.api_url, settings.request_timeout())?);
    let inbox = Inbox::new(source, store, SessionOptions::from(&settings));

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let result = runtime.block_on(async {
        let mut driver = Driver::new(inbox, std::io::stdout(), format);
        driver.start();
        driver.run(BufReader::new(tokio::io::stdin())).await
    });

    // Fetches still blocked on the network are abandoned on quit.
    runtime.shutdown_background();
    result
}
