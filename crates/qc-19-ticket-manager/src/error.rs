//! Error types for the ticket manager.
//!
//! Every error here is logged by the refresh task and never propagated to a
//! caller of the trust store; a failed refresh keeps the current cache.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TicketError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Archiver responded with status {0}")]
    Status(u16),

    #[error("No archivers available")]
    NoArchivers,
}
