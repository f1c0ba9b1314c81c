//! # Ticket Trust Store
//!
//! In-memory map of ticket type → latest verified [`TicketType`].
//!
//! Entries are only ever replaced whole, and only after their signatures
//! verified, so readers never observe a partially updated list. A refresh that
//! fails or returns nothing leaves the previous entries in place.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use qc_10_signature_verification::MultisigVerifier;
use shared_types::{parse_address, ValidationOutcome};
use tracing::{debug, info, warn};

use crate::config::{TicketPolicy, TicketSettings};
use crate::domain::{Ticket, TicketType};

/// Result of ingesting one catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub accepted: Vec<String>,
    pub rejected: Vec<String>,
}

pub struct TicketTrustStore {
    tickets: RwLock<HashMap<String, TicketType>>,
    verifier: Arc<dyn MultisigVerifier>,
    policy: TicketPolicy,
    settings: TicketSettings,
}

impl TicketTrustStore {
    pub fn new(
        verifier: Arc<dyn MultisigVerifier>,
        policy: TicketPolicy,
        settings: TicketSettings,
    ) -> Self {
        Self {
            tickets: RwLock::new(HashMap::new()),
            verifier,
            policy,
            settings,
        }
    }

    pub fn settings(&self) -> &TicketSettings {
        &self.settings
    }

    /// Check a ticket type's signatures against the ticket signer policy.
    pub fn verify_ticket_type(&self, ticket_type: &TicketType) -> bool {
        self.verifier.verify(
            &ticket_type.signing_payload(),
            &ticket_type.sign,
            &self.policy.multisig_keys,
            self.policy.required_signatures(),
            TicketPolicy::REQUIRED_LEVEL,
        )
    }

    /// Verify every entry of a fetched catalog and replace the ones that pass.
    pub fn ingest(&self, catalog: Vec<TicketType>) -> IngestReport {
        let mut report = IngestReport::default();
        for ticket_type in catalog {
            if self.verify_ticket_type(&ticket_type) {
                info!(
                    "[qc-19] ticket type {} added to ticket map ({} tickets)",
                    ticket_type.ticket_type,
                    ticket_type.data.len()
                );
                report.accepted.push(ticket_type.ticket_type.clone());
                self.tickets
                    .write()
                    .insert(ticket_type.ticket_type.clone(), ticket_type);
            } else {
                warn!(
                    "[qc-19] invalid signature for ticket type {}: {} signatures, {} required",
                    ticket_type.ticket_type,
                    ticket_type.sign.len(),
                    self.policy.required_signatures()
                );
                report.rejected.push(ticket_type.ticket_type);
            }
        }
        report
    }

    /// Tickets of `ticket_type`, empty when none are known.
    pub fn tickets_by_type(&self, ticket_type: &str) -> Vec<Ticket> {
        self.tickets
            .read()
            .get(ticket_type)
            .map(|t| t.data.clone())
            .unwrap_or_default()
    }

    /// Whether `address` holds a ticket of `ticket_type`.
    ///
    /// A disabled ticket type admits everyone.
    pub fn has_ticket(&self, ticket_type: &str, address: &str) -> ValidationOutcome {
        if !self.settings.is_enabled(ticket_type) {
            return ValidationOutcome::ok(format!("{ticket_type} tickets feature is not enabled"));
        }

        let tickets = self.tickets_by_type(ticket_type);
        if tickets.is_empty() {
            return ValidationOutcome::rejected(format!("No {ticket_type} tickets found"));
        }

        let Ok(wanted) = parse_address(address) else {
            debug!("[qc-19] malformed address {} in ticket lookup", address);
            return ValidationOutcome::rejected(format!(
                "Address does not have a {ticket_type} ticket"
            ));
        };

        let found = tickets.iter().any(|ticket| match parse_address(&ticket.address) {
            Ok(holder) => holder == wanted,
            Err(e) => {
                debug!(
                    "[qc-19] skipping malformed {} ticket address {}: {}",
                    ticket_type, ticket.address, e
                );
                false
            }
        });

        if found {
            ValidationOutcome::ok("")
        } else {
            ValidationOutcome::rejected(format!("Address does not have a {ticket_type} ticket"))
        }
    }

    pub fn len(&self) -> usize {
        self.tickets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.read().is_empty()
    }

    pub fn clear(&self) {
        self.tickets.write().clear();
    }
}
