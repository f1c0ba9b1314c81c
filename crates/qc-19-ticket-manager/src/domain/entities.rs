//! # Ticket Entities
//!
//! A ticket type is a signed allowlist published by archivers:
//!
//! ```json
//! {"type": "silver", "data": [{"address": "0x..."}], "sign": [{"owner": "0x...", "sig": "0x..."}]}
//! ```
//!
//! Signers sign the whole object minus `sign`, so fields this node does not
//! know about are kept and included in the signed payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared_types::Sign;

/// Ticket type gating validator nomination.
pub const SILVER_TICKET: &str = "silver";

/// One allowlisted address.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub address: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Ticket {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            extra: Map::new(),
        }
    }
}

/// A signed list of tickets of one type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TicketType {
    #[serde(rename = "type")]
    pub ticket_type: String,
    pub data: Vec<Ticket>,
    #[serde(default)]
    pub sign: Vec<Sign>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TicketType {
    pub fn new(ticket_type: impl Into<String>, data: Vec<Ticket>) -> Self {
        Self {
            ticket_type: ticket_type.into(),
            data,
            sign: Vec::new(),
            extra: Map::new(),
        }
    }

    /// The object signers sign: everything except `sign`.
    pub fn signing_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("type".into(), Value::from(self.ticket_type.clone()));
        payload.insert(
            "data".into(),
            Value::Array(
                self.data
                    .iter()
                    .map(|ticket| {
                        let mut entry = ticket.extra.clone();
                        entry.insert("address".into(), Value::from(ticket.address.clone()));
                        Value::Object(entry)
                    })
                    .collect(),
            ),
        );
        for (key, value) in &self.extra {
            payload.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Value::Object(payload)
    }
}

/// Address of an archiver serving `/tickets`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiverInfo {
    pub ip: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

impl ArchiverInfo {
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self {
            ip: ip.into(),
            port,
            public_key: None,
        }
    }

    pub fn tickets_url(&self) -> String {
        format!("http://{}:{}/tickets", self.ip, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_signing_payload_drops_sign_keeps_unknown_fields() {
        let ticket_type: TicketType = serde_json::from_value(json!({
            "type": "silver",
            "data": [{"address": "0xabc", "note": "genesis"}],
            "sign": [{"owner": "0x01", "sig": "0x02"}],
            "version": 2
        }))
        .unwrap();

        assert_eq!(ticket_type.sign.len(), 1);
        assert_eq!(
            ticket_type.signing_payload(),
            json!({
                "type": "silver",
                "data": [{"address": "0xabc", "note": "genesis"}],
                "version": 2
            })
        );
    }

    #[test]
    fn test_missing_sign_defaults_empty() {
        let ticket_type: TicketType =
            serde_json::from_str(r#"{"type":"silver","data":[]}"#).unwrap();
        assert!(ticket_type.sign.is_empty());
        assert!(ticket_type.extra.is_empty());
    }

    #[test]
    fn test_archiver_url() {
        let archiver: ArchiverInfo =
            serde_json::from_str(r#"{"ip":"10.0.0.5","port":4000,"publicKey":"ab"}"#).unwrap();
        assert_eq!(archiver.tickets_url(), "http://10.0.0.5:4000/tickets");
    }
}
