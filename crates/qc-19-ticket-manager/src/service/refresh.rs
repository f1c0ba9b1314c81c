//! # Ticket Refresh Task
//!
//! Periodically pulls the ticket catalog from one randomly chosen archiver
//! and feeds it to the [`TicketTrustStore`].
//!
//! The first refresh runs immediately on `start`. A failed fetch is logged
//! and treated as an empty catalog; the next tick is always scheduled.
//! `stop` signals the task through a watch channel and waits for it to exit.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::trust_store::{IngestReport, TicketTrustStore};
use crate::error::TicketError;
use crate::ports::{ArchiverDirectory, TicketCatalogSource};

/// Fetch once from a random archiver and ingest whatever verifies.
pub async fn refresh_once(
    store: &TicketTrustStore,
    archivers: &dyn ArchiverDirectory,
    catalog: &dyn TicketCatalogSource,
) -> Result<IngestReport, TicketError> {
    let archiver = archivers
        .archivers()
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or(TicketError::NoArchivers)?;
    debug!("[qc-19] refreshing tickets from {}:{}", archiver.ip, archiver.port);

    let ticket_types = match catalog.fetch_ticket_types(&archiver).await {
        Ok(ticket_types) => ticket_types,
        Err(e) => {
            error!(
                "[qc-19] error getting ticket list from {}:{}: {}",
                archiver.ip, archiver.port, e
            );
            Vec::new()
        }
    };
    Ok(store.ingest(ticket_types))
}

pub struct TicketRefreshTask {
    store: Arc<TicketTrustStore>,
    archivers: Arc<dyn ArchiverDirectory>,
    catalog: Arc<dyn TicketCatalogSource>,
    interval: Duration,
    shutdown_tx: Option<watch::Sender<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl TicketRefreshTask {
    pub fn new(
        store: Arc<TicketTrustStore>,
        archivers: Arc<dyn ArchiverDirectory>,
        catalog: Arc<dyn TicketCatalogSource>,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            archivers,
            catalog,
            interval,
            shutdown_tx: None,
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Spawn the periodic refresh. Calling `start` while running is a no-op.
    pub fn start(&mut self) {
        if self.is_running() {
            debug!("[qc-19] ticket refresh already running");
            return;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let store = self.store.clone();
        let archivers = self.archivers.clone();
        let catalog = self.catalog.clone();
        let period = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match refresh_once(&store, archivers.as_ref(), catalog.as_ref()).await {
                            Ok(report) => debug!(
                                "[qc-19] ticket refresh: {} accepted, {} rejected",
                                report.accepted.len(),
                                report.rejected.len()
                            ),
                            Err(e) => warn!("[qc-19] ticket refresh skipped: {}", e),
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        debug!("[qc-19] ticket refresh shutting down");
                        break;
                    }
                }
            }
        });

        info!("[qc-19] ticket refresh started (every {:?})", period);
        self.shutdown_tx = Some(shutdown_tx);
        self.handle = Some(handle);
    }

    /// Signal the task and wait for it to finish.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            if tx.send(true).is_err() {
                debug!("[qc-19] ticket refresh already exited");
            }
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!("[qc-19] ticket refresh task failed: {}", e);
            }
        }
        info!("[qc-19] ticket refresh stopped");
    }
}
