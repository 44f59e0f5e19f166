//! LINE credentials
//!
//! The channel access token is read from the secret store once per process
//! and kept for its lifetime. A failed read is not cached, so the next
//! request tries again.

use async_trait::async_trait;
use aws_sdk_secretsmanager::{error::DisplayErrorContext, Client};
use costbot_core::{CostBotError, Result};
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// Lookup of a secret's string value by identifier
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn secret_string(&self, secret_id: &str) -> Result<String>;
}

pub struct SecretsManagerStore {
    client: Client,
}

impl SecretsManagerStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn with_region(region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn secret_string(&self, secret_id: &str) -> Result<String> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| {
                CostBotError::Credentials(format!(
                    "Failed to read secret {}: {}",
                    secret_id,
                    DisplayErrorContext(&e)
                ))
            })?;

        output
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| CostBotError::Credentials(format!("Secret {} has no string value", secret_id)))
    }
}

#[derive(Clone)]
pub struct LineCredentials {
    access_token: String,
}

impl LineCredentials {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into() }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for LineCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineCredentials")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

pub struct CredentialCache {
    store: Arc<dyn SecretStore>,
    secret_name: String,
    token_field: String,
    cell: OnceCell<LineCredentials>,
}

impl CredentialCache {
    pub fn new(
        store: Arc<dyn SecretStore>,
        secret_name: impl Into<String>,
        token_field: impl Into<String>,
    ) -> Self {
        Self {
            store,
            secret_name: secret_name.into(),
            token_field: token_field.into(),
            cell: OnceCell::new(),
        }
    }

    /// Cached credentials, loading them on first use.
    pub async fn get(&self) -> Result<&LineCredentials> {
        self.cell.get_or_try_init(|| self.load()).await
    }

    /// Cold-start hook: loads the credentials ahead of the first request.
    pub async fn warm_up(&self) -> Result<()> {
        self.get().await.map(|_| ())
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    async fn load(&self) -> Result<LineCredentials> {
        let raw = self.store.secret_string(&self.secret_name).await?;
        let secret: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
            CostBotError::Credentials(format!("Secret {} is not JSON: {}", self.secret_name, e))
        })?;

        let token = secret
            .get(&self.token_field)
            .and_then(|v| v.as_str())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                CostBotError::Credentials(format!(
                    "Secret {} has no {} field",
                    self.secret_name, self.token_field
                ))
            })?;

        info!(secret = %self.secret_name, "Loaded LINE credentials");
        Ok(LineCredentials::new(token))
    }
}
