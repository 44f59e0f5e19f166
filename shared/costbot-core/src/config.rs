//! Configuration management for the cost bot

use crate::error::{CostBotError, Result};
use serde::Deserialize;
use std::env;

pub const DEFAULT_SECRET_NAME: &str = "linebot/credentials";
pub const DEFAULT_REGION: &str = "ap-northeast-1";
/// Cost Explorer is only served from us-east-1.
pub const DEFAULT_COST_EXPLORER_REGION: &str = "us-east-1";
pub const DEFAULT_REPLY_ENDPOINT: &str = "https://api.line.me/v2/bot/message/reply";
pub const DEFAULT_TOKEN_FIELD: &str = "LINE_ACCESS_TOKEN";
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    pub service_name: String,
    /// Secrets Manager identifier holding the LINE credentials.
    pub secret_name: String,
    pub region: String,
    pub cost_explorer_region: String,
    pub reply_endpoint: String,
    /// JSON field of the secret that carries the channel access token.
    pub token_field: String,
    pub top_n: usize,
    /// Bind address used when running outside Lambda.
    pub http_bind: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            service_name: "cost-bot".to_string(),
            secret_name: DEFAULT_SECRET_NAME.to_string(),
            region: DEFAULT_REGION.to_string(),
            cost_explorer_region: DEFAULT_COST_EXPLORER_REGION.to_string(),
            reply_endpoint: DEFAULT_REPLY_ENDPOINT.to_string(),
            token_field: DEFAULT_TOKEN_FIELD.to_string(),
            top_n: DEFAULT_TOP_N,
            http_bind: "0.0.0.0:8080".to_string(),
        }
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let top_n = match lookup("BREAKDOWN_TOP_N") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| CostBotError::Config(format!("Invalid BREAKDOWN_TOP_N: {}", e)))?,
            None => defaults.top_n,
        };
        if top_n == 0 {
            return Err(CostBotError::Config("BREAKDOWN_TOP_N must be at least 1".to_string()));
        }

        Ok(Self {
            service_name: lookup("SERVICE_NAME").unwrap_or(defaults.service_name),
            secret_name: lookup("SECRET_NAME").unwrap_or(defaults.secret_name),
            region: lookup("AWS_REGION").unwrap_or(defaults.region),
            cost_explorer_region: lookup("COST_EXPLORER_REGION")
                .unwrap_or(defaults.cost_explorer_region),
            reply_endpoint: lookup("LINE_REPLY_ENDPOINT").unwrap_or(defaults.reply_endpoint),
            token_field: lookup("LINE_TOKEN_FIELD").unwrap_or(defaults.token_field),
            top_n,
            http_bind: lookup("HTTP_BIND").unwrap_or(defaults.http_bind),
        })
    }
}
