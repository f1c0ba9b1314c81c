//! Ticket catalog client for the archiver `/tickets` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::domain::{ArchiverInfo, TicketType};
use crate::error::TicketError;
use crate::ports::TicketCatalogSource;

pub struct HttpTicketCatalog {
    client: Client,
}

impl HttpTicketCatalog {
    pub fn new() -> Result<Self, TicketError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(2))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TicketCatalogSource for HttpTicketCatalog {
    async fn fetch_ticket_types(&self, archiver: &ArchiverInfo) -> Result<Vec<TicketType>, TicketError> {
        let url = archiver.tickets_url();
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TicketError::Status(status.as_u16()));
        }

        let ticket_types: Vec<TicketType> = response.json().await?;
        debug!("[qc-19] fetched {} ticket types from {}", ticket_types.len(), url);
        Ok(ticket_types)
    }
}
