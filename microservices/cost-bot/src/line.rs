//! LINE Messaging API reply adapter

use async_trait::async_trait;
use costbot_core::{CostBotError, Result};
use reqwest::StatusCode;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::credentials::CredentialCache;

/// Sends a text reply correlated to an inbound event
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest<'a> {
    pub reply_token: &'a str,
    pub messages: Vec<TextMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TextMessage<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: &'a str,
}

impl<'a> ReplyRequest<'a> {
    pub fn text(reply_token: &'a str, text: &'a str) -> Self {
        Self {
            reply_token,
            messages: vec![TextMessage { kind: "text", text }],
        }
    }
}

pub struct LineReplyClient {
    endpoint: String,
    credentials: Arc<CredentialCache>,
    http_client: reqwest::Client,
}

impl LineReplyClient {
    pub fn new(endpoint: impl Into<String>, credentials: Arc<CredentialCache>) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ReplySender for LineReplyClient {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<()> {
        let credentials = self.credentials.get().await?;

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(credentials.access_token())
            .json(&ReplyRequest::text(reply_token, text))
            .send()
            .await
            .map_err(|e| CostBotError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "LINE rejected the reply");
            return Err(CostBotError::ReplyRejected { status: status.as_u16(), body });
        }

        info!(chars = text.chars().count(), "Reply sent to LINE");
        Ok(())
    }
}
