//! Error types for the cost bot

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CostBotError>;

#[derive(Error, Debug)]
pub enum CostBotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Webhook error: {0}")]
    Webhook(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Billing error: {0}")]
    Billing(String),

    #[error("Network error: {0}")]
    Network(String),

    /// The chat platform answered the reply call with a non-200 status.
    #[error("Reply rejected with status {status}: {body}")]
    ReplyRejected { status: u16, body: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CostBotError {
    /// Every failure is terminal for the invocation.
    pub fn status_code(&self) -> u16 {
        500
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Webhook(_) => "WEBHOOK_ERROR",
            Self::Credentials(_) => "CREDENTIALS_ERROR",
            Self::Billing(_) => "BILLING_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::ReplyRejected { .. } => "REPLY_REJECTED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<std::io::Error> for CostBotError {
    fn from(err: std::io::Error) -> Self {
        CostBotError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for CostBotError {
    fn from(err: serde_json::Error) -> Self {
        CostBotError::Webhook(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_is_internal_server_error() {
        let errors = [
            CostBotError::Config("x".into()),
            CostBotError::Billing("empty".into()),
            CostBotError::ReplyRejected { status: 400, body: "bad".into() },
        ];
        for err in errors {
            assert_eq!(err.status_code(), 500);
        }
    }

    #[test]
    fn test_reply_rejected_message() {
        let err = CostBotError::ReplyRejected { status: 401, body: "unauthorized".into() };
        assert_eq!(err.to_string(), "Reply rejected with status 401: unauthorized");
        assert_eq!(err.error_code(), "REPLY_REJECTED");
    }

    #[test]
    fn test_json_error_maps_to_webhook() {
        let err: CostBotError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, CostBotError::Webhook(_)));
    }
}
