//! # Node Configuration
//!
//! Settings for the treasury engine and the ticket manager.
//!
//! Loaded from a JSON file (`QC_CONFIG`), then overridden from the
//! environment:
//!
//! - `QC_GENESIS_SECURE_ACCOUNTS`: path of the genesis treasury file
//! - `QC_ARCHIVERS`: comma-separated `ip:port` list
//!
//! Every field has a default, so an empty `{}` file is a valid config.

use std::path::{Path, PathBuf};

use qc_18_secure_accounts::TreasuryConfig;
use qc_19_ticket_manager::{ArchiverInfo, TicketPolicy, TicketSettings};
use serde::Deserialize;
use shared_types::MultisigKeys;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeConfig {
    /// Signer keys and thresholds for global transactions.
    pub debug: DebugConfig,
    /// Cycle timing.
    pub p2p: P2pConfig,
    /// Feature switches.
    pub features: FeaturesConfig,
    /// Archivers serving the ticket catalog.
    pub archivers: Vec<ArchiverInfo>,
    /// Genesis treasury definitions.
    pub genesis_secure_accounts: GenesisConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DebugConfig {
    /// Owner address → security level (0-3).
    pub multisig_keys: MultisigKeys,
    pub min_multi_sig_required_for_global_txs: usize,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            multisig_keys: MultisigKeys::new(),
            min_multi_sig_required_for_global_txs: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct P2pConfig {
    /// Cycle length in seconds.
    pub cycle_duration: u64,
}

impl Default for P2pConfig {
    fn default() -> Self {
        Self { cycle_duration: 60 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeaturesConfig {
    pub tickets: TicketSettings,
    pub support_internal_tx_receipt: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            tickets: TicketSettings::default(),
            support_internal_tx_receipt: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenesisConfig {
    pub path: PathBuf,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config/genesis-secure-accounts.json"),
        }
    }
}

impl NodeConfig {
    /// Read a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply `QC_*` overrides read through `var`.
    pub fn apply_env_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = var("QC_GENESIS_SECURE_ACCOUNTS") {
            self.genesis_secure_accounts.path = PathBuf::from(path);
        }
        if let Some(list) = var("QC_ARCHIVERS") {
            self.archivers = parse_archivers(&list)?;
        }
        Ok(())
    }

    pub fn treasury_config(&self) -> TreasuryConfig {
        TreasuryConfig {
            multisig_keys: self.debug.multisig_keys.clone(),
            min_multisig_required_for_global_txs: self.debug.min_multi_sig_required_for_global_txs,
            support_internal_tx_receipt: self.features.support_internal_tx_receipt,
        }
    }

    pub fn ticket_policy(&self) -> TicketPolicy {
        TicketPolicy {
            multisig_keys: self.debug.multisig_keys.clone(),
            min_multisig_required_for_global_txs: self.debug.min_multi_sig_required_for_global_txs,
        }
    }
}

/// Parse `ip:port[,ip:port...]`.
pub fn parse_archivers(list: &str) -> Result<Vec<ArchiverInfo>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (ip, port) = entry
                .rsplit_once(':')
                .ok_or_else(|| ConfigError::InvalidArchiver(entry.to_string()))?;
            let port = port
                .parse()
                .map_err(|_| ConfigError::InvalidArchiver(entry.to_string()))?;
            Ok(ArchiverInfo::new(ip, port))
        })
        .collect()
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid archiver address {0:?}, expected ip:port")]
    InvalidArchiver(String),
}
