//! Outbound ports (driven side - SPI)

use async_trait::async_trait;

use crate::domain::{ArchiverInfo, TicketType};
use crate::error::TicketError;

/// Port: Current archiver list
pub trait ArchiverDirectory: Send + Sync {
    fn archivers(&self) -> Vec<ArchiverInfo>;
}

/// Port: Fetch the ticket catalog from one archiver
#[async_trait]
pub trait TicketCatalogSource: Send + Sync {
    async fn fetch_ticket_types(&self, archiver: &ArchiverInfo) -> Result<Vec<TicketType>, TicketError>;
}
