//! Ticket feature settings and signer policy

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared_types::{MultisigKeys, SecurityLevel};

/// Per-type feature switch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketTypeConfig {
    #[serde(rename = "type")]
    pub ticket_type: String,
    pub enabled: bool,
}

/// `features.tickets` block of the node config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketSettings {
    /// Refresh period; unset or zero falls back to one cycle.
    pub update_ticket_list_time_in_ms: Option<u64>,
    pub ticket_types: Vec<TicketTypeConfig>,
}

impl TicketSettings {
    /// Whether `ticket_type` is switched on. Unlisted types are off.
    pub fn is_enabled(&self, ticket_type: &str) -> bool {
        self.ticket_types
            .iter()
            .find(|t| t.ticket_type == ticket_type)
            .is_some_and(|t| t.enabled)
    }

    pub fn refresh_interval(&self, cycle_duration_secs: u64) -> Duration {
        let ms = match self.update_ticket_list_time_in_ms {
            Some(ms) if ms > 0 => ms,
            _ => cycle_duration_secs.saturating_mul(1000),
        };
        Duration::from_millis(ms.max(1))
    }
}

/// Signer policy for ticket catalogs.
#[derive(Clone, Debug, Default)]
pub struct TicketPolicy {
    pub multisig_keys: MultisigKeys,
    pub min_multisig_required_for_global_txs: usize,
}

impl TicketPolicy {
    /// Tickets always need at least this many signers.
    pub const MIN_SIGNATURES: usize = 3;
    pub const REQUIRED_LEVEL: SecurityLevel = SecurityLevel::High;

    pub fn required_signatures(&self) -> usize {
        self.min_multisig_required_for_global_txs
            .max(Self::MIN_SIGNATURES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_interval_fallback() {
        let mut settings = TicketSettings::default();
        assert_eq!(settings.refresh_interval(60), Duration::from_secs(60));
        settings.update_ticket_list_time_in_ms = Some(0);
        assert_eq!(settings.refresh_interval(60), Duration::from_secs(60));
        settings.update_ticket_list_time_in_ms = Some(250);
        assert_eq!(settings.refresh_interval(60), Duration::from_millis(250));
        assert_eq!(TicketSettings::default().refresh_interval(0), Duration::from_millis(1));
    }

    #[test]
    fn test_settings_json() {
        let settings: TicketSettings = serde_json::from_str(
            r#"{"updateTicketListTimeInMs": 1000, "ticketTypes": [{"type": "silver", "enabled": true}]}"#,
        )
        .unwrap();
        assert!(settings.is_enabled("silver"));
        assert!(!settings.is_enabled("gold"));
    }

    #[test]
    fn test_signature_floor() {
        let mut policy = TicketPolicy::default();
        assert_eq!(policy.required_signatures(), 3);
        policy.min_multisig_required_for_global_txs = 5;
        assert_eq!(policy.required_signatures(), 5);
    }
}
