//! `invoicedesk-client`
//!
//! **Responsibility:** talk to the invoice service over HTTP.
//!
//! This crate provides:
//! - Environment-driven client configuration
//! - An async client for listing, fetching and creating invoices
//! - A submission guard that keeps one create request in flight at a time
//!
//! The service is the authority for persistence and authorization; this
//! client only sends the totals it computed and never reconciles them.

pub mod client;
pub mod config;
pub mod error;
pub mod guard;

pub use client::InvoiceClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use guard::{SubmissionGuard, SubmissionTicket};
