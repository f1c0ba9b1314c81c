//! # Node Runtime
//!
//! Entry point wiring the treasury engine and the ticket manager.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (`QC_CONFIG` file, then `QC_*` overrides)
//! 2. Load and validate the genesis secure-account file (fatal on error)
//! 3. Seed the genesis treasury accounts
//! 4. Start the ticket refresh task
//! 5. Run until Ctrl+C, then stop the refresh task

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use node_runtime::container::{NodeConfig, SubsystemContainer};
use qc_19_ticket_manager::TicketRefreshTask;
use shared_types::CycleInfo;

/// The node runtime owning the subsystems and their background tasks.
pub struct NodeRuntime {
    container: Arc<SubsystemContainer>,
    ticket_refresh: Option<TicketRefreshTask>,
}

impl NodeRuntime {
    pub fn new(config: NodeConfig) -> Result<Self> {
        info!("Creating node runtime");
        let container = Arc::new(SubsystemContainer::new(config)?);
        Ok(Self {
            container,
            ticket_refresh: None,
        })
    }

    /// Seed genesis and start background tasks.
    pub async fn start(&mut self) -> Result<()> {
        let now_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock before unix epoch")?
            .as_secs();
        let seeded = self.container.seed_genesis(&[CycleInfo { start: now_secs }])?;
        info!("Seeded {} genesis treasury accounts", seeded);

        let mut refresh = self.container.ticket_refresh_task()?;
        refresh.start();
        self.ticket_refresh = Some(refresh);
        Ok(())
    }

    /// Stop background tasks and wait for them to exit.
    pub async fn shutdown(&mut self) {
        info!("Initiating graceful shutdown...");
        if let Some(mut refresh) = self.ticket_refresh.take() {
            refresh.stop().await;
        }
        info!("Shutdown complete");
    }

    pub fn container(&self) -> Arc<SubsystemContainer> {
        Arc::clone(&self.container)
    }
}

/// Load configuration from file and environment.
fn load_config() -> Result<NodeConfig> {
    let mut config = match std::env::var("QC_CONFIG") {
        Ok(path) => {
            info!("Loading configuration from {}", path);
            NodeConfig::from_file(&path)?
        }
        Err(_) => NodeConfig::default(),
    };
    config.apply_env_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config().context("failed to load node configuration")?;

    let mut runtime = NodeRuntime::new(config)?;
    runtime.start().await?;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;

    Ok(())
}
