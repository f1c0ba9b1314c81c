//! # Ticket Manager (Subsystem 19)
//!
//! Allowlist of addresses holding a "ticket" of some type (e.g. `silver`),
//! published by archivers and trusted only when enough High-level signers
//! signed it.
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Adapters                                    │
//! │  - HttpTicketCatalog: GET {archiver}/tickets │
//! │  - StaticArchiverList                        │
//! └──────────────────────────────────────────────┘
//!                       │
//! ┌──────────────────────────────────────────────┐
//! │  Ports                                       │
//! │  - ArchiverDirectory, TicketCatalogSource    │
//! └──────────────────────────────────────────────┘
//!                       │
//! ┌──────────────────────────────────────────────┐
//! │  Service                                     │
//! │  - TicketTrustStore (verified entries)       │
//! │  - TicketRefreshTask (periodic, cancellable) │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Lookups read the in-memory map only and never wait on the network.

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

mod config;
mod error;

pub use config::{TicketPolicy, TicketSettings, TicketTypeConfig};
pub use error::TicketError;

pub use adapters::{HttpTicketCatalog, StaticArchiverList};
pub use domain::{ArchiverInfo, Ticket, TicketType, SILVER_TICKET};
pub use ports::{ArchiverDirectory, TicketCatalogSource};
pub use service::{refresh_once, IngestReport, TicketRefreshTask, TicketTrustStore};

/// Subsystem identifier used in log prefixes.
pub const SUBSYSTEM_ID: u8 = 19;
