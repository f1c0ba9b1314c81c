//! # Subsystem Container
//!
//! Holds the treasury engine, the ticket trust store and the node's account
//! state, built once from [`NodeConfig`].
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: Signature Verification (no dependencies)
//! Level 1: Secure account registry (genesis file)
//! Level 2: Treasury engine, Ticket trust store
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tracing::info;

use qc_04_state_management::InMemoryWrappedStates;
use qc_10_signature_verification::{EthMultisigVerifier, MultisigVerifier};
use qc_18_secure_accounts::{SecureAccountEngine, SecureAccountRegistry, SystemClock};
use qc_19_ticket_manager::{
    HttpTicketCatalog, StaticArchiverList, TicketRefreshTask, TicketTrustStore,
};
use shared_types::CycleInfo;

use crate::container::config::NodeConfig;

pub struct SubsystemContainer {
    /// Signature Verification (Subsystem 10)
    pub verifier: Arc<dyn MultisigVerifier>,

    /// Secure Accounts (Subsystem 18)
    pub secure_accounts: Arc<SecureAccountEngine>,

    /// Ticket Manager (Subsystem 19)
    pub tickets: Arc<TicketTrustStore>,

    /// Account state seeded at genesis.
    pub states: Arc<Mutex<InMemoryWrappedStates>>,

    pub config: NodeConfig,
}

impl SubsystemContainer {
    pub fn new(config: NodeConfig) -> Result<Self> {
        let verifier: Arc<dyn MultisigVerifier> = Arc::new(EthMultisigVerifier::new());

        let genesis_path = &config.genesis_secure_accounts.path;
        let registry = SecureAccountRegistry::from_file(genesis_path).with_context(|| {
            format!(
                "invalid genesis secure account config {}",
                genesis_path.display()
            )
        })?;
        info!(
            "[node] {} secure accounts configured from {}",
            registry.len(),
            genesis_path.display()
        );

        let secure_accounts = Arc::new(SecureAccountEngine::new(
            Arc::new(registry),
            verifier.clone(),
            config.treasury_config(),
            Arc::new(SystemClock),
        ));

        let tickets = Arc::new(TicketTrustStore::new(
            verifier.clone(),
            config.ticket_policy(),
            config.features.tickets.clone(),
        ));

        Ok(Self {
            verifier,
            secure_accounts,
            tickets,
            states: Arc::new(Mutex::new(InMemoryWrappedStates::new())),
            config,
        })
    }

    /// Write the genesis treasury accounts into the node state.
    pub fn seed_genesis(&self, cycles: &[CycleInfo]) -> Result<usize> {
        let genesis = self
            .secure_accounts
            .genesis(cycles)
            .context("failed to build genesis secure accounts")?;
        genesis
            .seed(&mut *self.states.lock())
            .context("failed to seed genesis secure accounts")?;
        Ok(genesis.len())
    }

    /// Refresh task for the ticket store, not yet started.
    pub fn ticket_refresh_task(&self) -> Result<TicketRefreshTask> {
        let catalog = HttpTicketCatalog::new().context("failed to build ticket catalog client")?;
        Ok(TicketRefreshTask::new(
            self.tickets.clone(),
            Arc::new(StaticArchiverList::new(self.config.archivers.clone())),
            Arc::new(catalog),
            self.config
                .features
                .tickets
                .refresh_interval(self.config.p2p.cycle_duration),
        ))
    }
}
