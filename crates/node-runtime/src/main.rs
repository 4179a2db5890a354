//! # OrderStream Validator
//!
//! Entry point for the validator-side state machine.
//!
//! ## Startup Sequence
//!
//! 1. Install logging (`RUST_LOG`, default `info`)
//! 2. Load configuration from `OS_*` environment variables
//! 3. Validate it for production (the validator key is mandatory)
//! 4. Bootstrap: genesis, snapshot restore, order bus, application
//! 5. Attach the broadcast log subscriber
//! 6. Serve until Ctrl+C, then persist the committed state
//!
//! The consensus engine connection is external; it drives the application
//! through `check_tx`, `deliver_tx`, `begin_block`, `commit` and `info`.

use anyhow::{Context, Result};
use shared_bus::{EventStream, TopicFilter};
use tokio_stream::StreamExt;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use node_runtime::{NodeConfig, NodeContainer};

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let config = NodeConfig::from_env().context("Failed to load configuration")?;
    config
        .validate_for_production()
        .context("Configuration is not fit for production")?;

    let container = NodeContainer::bootstrap(config).context("Failed to bootstrap node")?;

    let info = container.application.info();
    info!("===========================================");
    info!("  OrderStream Validator v{}", info.version);
    info!("===========================================");
    info!(
        height = info.last_block_height,
        app_hash = %hex::encode(info.last_block_app_hash),
        address = %container.signer.address(),
        data_dir = %container.config.storage.data_dir.display(),
        "Validator ready"
    );

    let subscription = container
        .bus
        .subscribe(TopicFilter::all())
        .context("Failed to subscribe broadcast logger")?;
    let mut events = EventStream::new(subscription);
    debug!(subscribers = container.bus.subscriber_count(), "Broadcast logger attached");
    let logger = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            debug!(topic = %event.topic, sequence = event.sequence, "Broadcast");
        }
    });

    info!("Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Initiating graceful shutdown...");
    logger.abort();
    if let Err(e) = container.shutdown() {
        error!("Failed to persist state on shutdown: {}", e);
        return Err(e).context("Shutdown failed");
    }

    info!(broadcast = container.bus.events_emitted(), "Shutdown complete");
    Ok(())
}
