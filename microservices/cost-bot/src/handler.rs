//! Webhook handler
//!
//! Runs one request end to end and translates the outcome into the
//! hosting platform's `{statusCode, body}` response at the very edge.

use chrono::{NaiveDate, Utc};
use costbot_core::{CostBotError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::billing::BillingClient;
use crate::line::ReplySender;
use crate::period::{BillingMode, BillingPeriod};
use crate::types::Invoice;
use crate::webhook::{Command, InboundMessage, HELP_TEXT};

/// Body returned when the chat platform refuses the reply.
pub const REPLY_FAILED_BODY: &str = "Failed to send message to LINE";

/// Invocation payload (API Gateway / function URL proxy shape)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvocationEvent {
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl HandlerResponse {
    pub fn ok() -> Self {
        Self { status_code: 200, body: None }
    }

    pub fn from_result(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(err @ CostBotError::ReplyRejected { .. }) => Self {
                status_code: err.status_code(),
                body: Some(REPLY_FAILED_BODY.to_string()),
            },
            Err(err) => Self {
                status_code: err.status_code(),
                body: Some(err.to_string()),
            },
        }
    }
}

#[derive(Clone)]
pub struct CostBot {
    billing: BillingClient,
    replier: Arc<dyn ReplySender>,
    top_n: usize,
}

impl CostBot {
    pub fn new(billing: BillingClient, replier: Arc<dyn ReplySender>, top_n: usize) -> Self {
        Self { billing, replier, top_n }
    }

    pub async fn handle(&self, event: &InvocationEvent) -> HandlerResponse {
        self.handle_on(event.body.as_deref(), Utc::now().date_naive()).await
    }

    /// Same as [`handle`](Self::handle) with an explicit "today".
    pub async fn handle_on(&self, body: Option<&str>, today: NaiveDate) -> HandlerResponse {
        let result = match body {
            Some(body) => self.process(body, today).await,
            None => Err(CostBotError::Webhook("Event has no body".to_string())),
        };

        if let Err(err) = &result {
            error!(code = err.error_code(), error = %err, "Webhook handling failed");
        }
        HandlerResponse::from_result(result)
    }

    pub async fn process(&self, body: &str, today: NaiveDate) -> Result<()> {
        let inbound = InboundMessage::parse(body)?;
        info!(command = ?inbound.command, "Webhook received");

        let text = match inbound.command {
            Command::Help => HELP_TEXT.to_string(),
            Command::Invoice(mode) => self.build_invoice(mode, today).await?.render(),
        };

        self.replier.reply_text(&inbound.reply_token, &text).await
    }

    /// Queries run in order: total, previous total (diff mode only), breakdown.
    pub async fn build_invoice(&self, mode: BillingMode, today: NaiveDate) -> Result<Invoice> {
        let period = BillingPeriod::resolve(today, mode)?;

        let total = self.billing.fetch_total(&period.primary).await?;
        let delta = match &period.previous {
            Some(previous) => Some(total - self.billing.fetch_total(previous).await?),
            None => None,
        };
        let breakdown = self.billing.fetch_breakdown(&period.primary, self.top_n).await?;

        info!(
            window = %period.primary,
            total = %total,
            delta = ?delta,
            services = breakdown.len(),
            "Invoice built"
        );

        Ok(Invoice {
            period_label: period.label(),
            total,
            breakdown,
            delta,
        })
    }
}
