//! Bazaar store daemon.
//!
//! Loads configuration and persisted state, runs the autosave and
//! repricing jobs, and shuts down cleanly on SIGINT with a final save.
//! Real deployments embed the library and wire in concrete currency and
//! pricing providers; standalone the daemon runs with the null providers.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bazaar::{
    AuctionHouse, MarketConfig, NullCurrency, NullOracle, Scheduler, StorageManager, SystemClock,
    SystemIds,
};

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BAZAAR_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bazaar")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let dir = data_dir();
    let config_path = dir.join("bazaar.toml");
    let config = if config_path.exists() {
        MarketConfig::load(&config_path)?
    } else {
        MarketConfig::default()
    };
    info!(dir = %dir.display(), "starting bazaar store");

    let clock = Arc::new(SystemClock::new());
    let house = AuctionHouse::new(
        Arc::new(config.clone()),
        clock.clone(),
        Arc::new(SystemIds::new()),
        Arc::new(NullCurrency::new()),
        Arc::new(NullOracle::new()),
    );

    let storage = Arc::new(StorageManager::from_config(&dir, &config, clock));
    storage.load(&house)?;
    info!(
        listings = house.listing_count(),
        transactions = house.transaction_count(),
        "state loaded"
    );

    let mut scheduler = Scheduler::new(house, storage);
    scheduler.start_autosave();
    scheduler.start_repricing();

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    scheduler.shutdown().await;

    Ok(())
}
