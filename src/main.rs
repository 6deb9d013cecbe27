//! Shopdesk main entry point

use anyhow::Context;
use clap::Parser;
use shopdesk_api::start_server;
use shopdesk_config::{Config, ConfigError};
use shopdesk_core::Directory;
use shopdesk_loader::JsonRecordSource;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::RwLock;

#[derive(Parser, Debug)]
#[command(name = "shopdesk")]
#[command(author = "Shopdesk Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight admin dashboard for small retail and garment shops", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    // a missing file falls back to defaults; anything else is fatal
    let (config, missing) = match Config::load(args.config.clone()) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(e) => anyhow::bail!("Failed to load {}\n{}", args.config.display(), e.to_details()),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    if missing {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    }
    log::info!("Config loaded: data path={}", config.data.path.display());

    let rt = Runtime::new()?;
    rt.block_on(async {
        let directory = Arc::new(RwLock::new(Directory::new(Arc::new(JsonRecordSource))));

        {
            let mut guard = directory.write().await;
            match guard.load(config.data.path.clone()).await {
                Ok(summary) => log::info!("Records loaded: {} total", summary.total()),
                Err(e) => log::error!("Failed to load records: {}", e.to_details()),
            }
        }

        start_server(config, directory).await.context("Server error")
    })
}
