//! LINE webhook payload and command routing

use costbot_core::{CostBotError, Result};
use serde::Deserialize;

use crate::period::BillingMode;

/// Usage message sent for the help keywords.
pub const HELP_TEXT: &str = "【目的】\n\
AWSのコストを請求書形式のメッセージで通知します\n\
\n\
【使い方】\n\
- 「コスト」：今月のコストを確認\n\
- 「先月」：先月のコストを確認\n\
\n\
【コマンド】\n\
- '先月' → 先月の請求書のみを表示\n\
- '内訳' → 詳細な内訳をすべて表示（今後対応予定）\n";

const HELP_KEYWORDS: &[&str] = &["help", "ヘルプ", "使い方"];
const PREVIOUS_MONTH_KEYWORD: &str = "先月";

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub reply_token: Option<String>,
    pub message: Option<EventMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventMessage {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Invoice(BillingMode),
}

impl Command {
    /// Case-insensitive, surrounding whitespace ignored. Unknown or absent
    /// text asks for the current month's invoice.
    pub fn parse(text: Option<&str>) -> Self {
        let keyword = text.map(|t| t.trim().to_lowercase()).unwrap_or_default();

        if HELP_KEYWORDS.contains(&keyword.as_str()) {
            Self::Help
        } else if keyword == PREVIOUS_MONTH_KEYWORD {
            Self::Invoice(BillingMode::PreviousMonth)
        } else {
            Self::Invoice(BillingMode::CurrentMonth)
        }
    }
}

/// The first event of a webhook delivery, reduced to what the bot needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub reply_token: String,
    pub command: Command,
}

impl InboundMessage {
    pub fn parse(body: &str) -> Result<Self> {
        let body: WebhookBody = serde_json::from_str(body)?;
        let event = body
            .events
            .into_iter()
            .next()
            .ok_or_else(|| CostBotError::Webhook("Webhook contains no events".to_string()))?;

        let reply_token = event
            .reply_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| CostBotError::Webhook("Event has no replyToken".to_string()))?;

        let text = event.message.and_then(|m| m.text);
        Ok(Self {
            reply_token,
            command: Command::parse(text.as_deref()),
        })
    }
}
