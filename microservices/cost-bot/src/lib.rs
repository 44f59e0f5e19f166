//! Cost Bot
//!
//! LINE bot that answers chat messages with an invoice-style summary of
//! the account's AWS spend:
//! - Month window resolution (current month with diff, or previous month)
//! - Cost Explorer total and per-service breakdown queries
//! - Fixed-width invoice rendering
//! - Reply through the LINE Messaging API

pub mod api;
pub mod billing;
pub mod credentials;
pub mod handler;
pub mod invoice;
pub mod line;
pub mod period;
pub mod service_map;
pub mod types;
pub mod webhook;

pub use billing::{BillingClient, CostExplorerQuery, CostQuery, CostReport};
pub use credentials::{CredentialCache, LineCredentials, SecretStore, SecretsManagerStore};
pub use handler::{CostBot, HandlerResponse, InvocationEvent};
pub use line::{LineReplyClient, ReplySender};
pub use period::{BillingMode, BillingPeriod};
pub use types::*;
pub use webhook::{Command, InboundMessage};
