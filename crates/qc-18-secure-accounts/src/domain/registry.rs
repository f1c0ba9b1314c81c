//! # Secure Account Registry
//!
//! Static treasury definitions loaded once at genesis. Each entry names a
//! source EOA that funds transfers, the recipient EOA that receives them and
//! the secure account holding the transfer policy.
//!
//! ## Invariants
//!
//! - Names are non-empty and unique.
//! - For every entry, source ≠ recipient.
//! - Across all entries, no source or recipient address appears twice.
//! - Each secure account address is distinct from every source, recipient
//!   and other secure account address.
//!
//! A violation is a configuration bug that could misroute treasury funds, so
//! construction fails and the node must not start.

use std::collections::HashMap;
use std::path::Path;

use qc_04_state_management::{to_state_address, StateAddress};
use serde::{Deserialize, Serialize};
use shared_types::{parse_address, U256};
use tracing::info;

use super::transaction::TransferFromSecureAccountTx;
use crate::error::{ConfigError, RegistryError};

/// One genesis treasury definition. Field names match the genesis file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecureAccountConfig {
    pub name: String,
    pub source_funds_address: String,
    pub recipient_funds_address: String,
    /// 20-byte or 32-byte hex address of the secure account itself.
    pub secure_account_address: String,
    /// Decimal genesis balance of the source EOA.
    pub source_funds_balance: String,
}

/// State keys and parsed values derived from a validated entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSecureAccount {
    pub config: SecureAccountConfig,
    pub source_key: StateAddress,
    pub recipient_key: StateAddress,
    pub secure_key: StateAddress,
    pub source_funds_balance: U256,
}

/// Keys the host must hold exclusively while a transfer executes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrackedKeys {
    /// Source EOA and the secure account.
    pub source_keys: Vec<StateAddress>,
    /// Recipient EOA.
    pub target_keys: Vec<StateAddress>,
}

/// Check the cross-entry address invariants.
pub fn validate_config(configs: &[SecureAccountConfig]) -> Result<(), ConfigError> {
    let mut owners: HashMap<[u8; 20], &str> = HashMap::new();
    let mut funds_keys: HashMap<StateAddress, &str> = HashMap::new();

    for config in configs {
        let source = parse_field(config, "SourceFundsAddress", &config.source_funds_address)?;
        let recipient = parse_field(config, "RecipientFundsAddress", &config.recipient_funds_address)?;

        if source == recipient {
            return Err(ConfigError::SourceIsRecipient {
                name: config.name.clone(),
                address: config.source_funds_address.clone(),
            });
        }

        for (address, field, raw) in [
            (source, "SourceFundsAddress", &config.source_funds_address),
            (recipient, "RecipientFundsAddress", &config.recipient_funds_address),
        ] {
            if let Some(first) = owners.insert(address, &config.name) {
                return Err(ConfigError::DuplicateAddress {
                    address: raw.clone(),
                    first: first.to_string(),
                    second: config.name.clone(),
                });
            }
            funds_keys.insert(state_key(config, field, raw)?, &config.name);
        }
    }

    // Secure accounts must be disjoint from every funds address and from each other.
    let mut secure_keys: HashMap<StateAddress, &str> = HashMap::new();
    for config in configs {
        let secure = state_key(config, "SecureAccountAddress", &config.secure_account_address)?;
        let taken = match funds_keys.get(&secure) {
            Some(owner) => Some(*owner),
            None => secure_keys.insert(secure, &config.name),
        };
        if let Some(owner) = taken {
            return Err(ConfigError::SecureAddressConflict {
                name: config.name.clone(),
                address: config.secure_account_address.clone(),
                owner: owner.to_string(),
            });
        }
    }
    Ok(())
}

fn state_key(
    config: &SecureAccountConfig,
    field: &'static str,
    value: &str,
) -> Result<StateAddress, ConfigError> {
    to_state_address(value).map_err(|reason| ConfigError::InvalidAddress {
        name: config.name.clone(),
        field,
        reason,
    })
}

fn parse_field(
    config: &SecureAccountConfig,
    field: &'static str,
    value: &str,
) -> Result<[u8; 20], ConfigError> {
    parse_address(value).map_err(|reason| ConfigError::InvalidAddress {
        name: config.name.clone(),
        field,
        reason,
    })
}

fn resolve_entry(index: usize, config: SecureAccountConfig) -> Result<ResolvedSecureAccount, ConfigError> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::EmptyName { index });
    }
    let source_key = state_key(&config, "SourceFundsAddress", &config.source_funds_address)?;
    let recipient_key = state_key(&config, "RecipientFundsAddress", &config.recipient_funds_address)?;
    let secure_key = state_key(&config, "SecureAccountAddress", &config.secure_account_address)?;

    let balance = &config.source_funds_balance;
    let source_funds_balance = Some(balance.as_str())
        .filter(|b| !b.is_empty() && b.bytes().all(|c| c.is_ascii_digit()))
        .and_then(|b| U256::from_dec_str(b).ok())
        .ok_or_else(|| ConfigError::InvalidBalance {
            name: config.name.clone(),
            value: balance.clone(),
        })?;

    Ok(ResolvedSecureAccount {
        source_key,
        recipient_key,
        secure_key,
        source_funds_balance,
        config,
    })
}

/// Validated, immutable name → treasury map.
#[derive(Clone, Debug, Default)]
pub struct SecureAccountRegistry {
    entries: Vec<ResolvedSecureAccount>,
    by_name: HashMap<String, usize>,
}

impl SecureAccountRegistry {
    /// Validate `configs` and build the registry. Entry order is preserved.
    pub fn new(configs: Vec<SecureAccountConfig>) -> Result<Self, ConfigError> {
        validate_config(&configs)?;

        let mut entries = Vec::with_capacity(configs.len());
        let mut by_name = HashMap::with_capacity(configs.len());
        for (index, config) in configs.into_iter().enumerate() {
            let resolved = resolve_entry(index, config)?;
            if by_name.insert(resolved.config.name.clone(), index).is_some() {
                return Err(ConfigError::DuplicateName(resolved.config.name));
            }
            entries.push(resolved);
        }

        info!("[qc-18] loaded {} secure account definitions", entries.len());
        Ok(Self { entries, by_name })
    }

    /// Parse a JSON array of entries.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let configs: Vec<SecureAccountConfig> =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::new(configs)
    }

    /// Read and parse a genesis file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedSecureAccount> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    pub fn resolve(&self, name: &str) -> Result<&ResolvedSecureAccount, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::UnknownAccount(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedSecureAccount> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declare the accounts a transfer touches.
    pub fn crack(&self, tx: &TransferFromSecureAccountTx) -> Result<CrackedKeys, RegistryError> {
        let entry = self.resolve(&tx.account_name)?;
        Ok(CrackedKeys {
            source_keys: vec![entry.source_key.clone(), entry.secure_key.clone()],
            target_keys: vec![entry.recipient_key.clone()],
        })
    }
}
