//! Webhook Flow Integration Tests
//!
//! Drives the handler end to end against in-memory billing and reply fakes

use async_trait::async_trait;
use chrono::NaiveDate;
use cost_bot::{
    BillingClient, BillingWindow, CostBot, CostQuery, CostReport, HandlerResponse, ReplySender,
};
use costbot_core::{CostBotError, Result};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn total_report(amount: &str) -> CostReport {
    serde_json::from_value(json!({
        "ResultsByTime": [{
            "TimePeriod": { "Start": "ignored", "End": "ignored" },
            "Total": { "BlendedCost": { "Amount": amount, "Unit": "USD" } },
            "Groups": [],
            "Estimated": true
        }]
    }))
    .unwrap()
}

fn grouped_report(entries: &[(&str, &str)]) -> CostReport {
    let groups: Vec<_> = entries
        .iter()
        .map(|(name, amount)| {
            json!({
                "Keys": [name],
                "Metrics": { "BlendedCost": { "Amount": amount, "Unit": "USD" } }
            })
        })
        .collect();
    serde_json::from_value(json!({ "ResultsByTime": [{ "Total": {}, "Groups": groups }] })).unwrap()
}

// Fake billing API keyed by (window start, grouped)
#[derive(Default)]
struct FakeCostQuery {
    reports: HashMap<(NaiveDate, bool), CostReport>,
    calls: Mutex<Vec<(BillingWindow, bool)>>,
}

impl FakeCostQuery {
    fn with(mut self, start: NaiveDate, grouped: bool, report: CostReport) -> Self {
        self.reports.insert((start, grouped), report);
        self
    }

    fn calls(&self) -> Vec<(BillingWindow, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CostQuery for FakeCostQuery {
    async fn get_cost_and_usage(
        &self,
        window: &BillingWindow,
        group_by_service: bool,
    ) -> Result<CostReport> {
        self.calls.lock().unwrap().push((*window, group_by_service));
        Ok(self
            .reports
            .get(&(window.start(), group_by_service))
            .cloned()
            .unwrap_or_default())
    }
}

// Fake chat platform recording every reply
struct FakeReplier {
    status: u16,
    replies: Mutex<Vec<(String, String)>>,
}

impl FakeReplier {
    fn accepting() -> Arc<Self> {
        Arc::new(Self { status: 200, replies: Mutex::new(Vec::new()) })
    }

    fn rejecting(status: u16) -> Arc<Self> {
        Arc::new(Self { status, replies: Mutex::new(Vec::new()) })
    }

    fn replies(&self) -> Vec<(String, String)> {
        self.replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySender for FakeReplier {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<()> {
        self.replies
            .lock()
            .unwrap()
            .push((reply_token.to_string(), text.to_string()));
        if self.status == 200 {
            Ok(())
        } else {
            Err(CostBotError::ReplyRejected { status: self.status, body: "rejected".to_string() })
        }
    }
}

fn webhook_body(text: &str) -> String {
    json!({
        "destination": "Uxxxxxxxx",
        "events": [{
            "type": "message",
            "replyToken": "reply-token-1",
            "source": { "type": "user", "userId": "U1" },
            "message": { "type": "text", "id": "100", "text": text }
        }]
    })
    .to_string()
}

fn march_account() -> FakeCostQuery {
    FakeCostQuery::default()
        .with(date(2024, 3, 1), false, total_report("123.4000000000"))
        .with(date(2024, 2, 1), false, total_report("100.00"))
        .with(
            date(2024, 3, 1),
            true,
            grouped_report(&[
                ("AWS Lambda", "0.50"),
                ("Amazon Elastic Compute Cloud - Compute", "60.00"),
                ("Amazon Simple Storage Service", "12.30"),
                ("Tax", "11.22"),
                ("Amazon CloudWatch", "25.00"),
                ("Amazon Route 53", "14.38"),
            ]),
        )
}

fn bot(query: Arc<FakeCostQuery>, replier: Arc<FakeReplier>) -> CostBot {
    CostBot::new(BillingClient::new(query), replier, 5)
}

#[tokio::test]
async fn test_unrecognized_keyword_replies_current_month_invoice() {
    let query = Arc::new(march_account());
    let replier = FakeReplier::accepting();
    let bot = bot(query.clone(), replier.clone());

    let response = bot.handle_on(Some(webhook_body("コスト").as_str()), date(2024, 3, 15)).await;

    assert_eq!(response, HandlerResponse::ok());

    let replies = replier.replies();
    assert_eq!(replies.len(), 1);
    let (token, text) = &replies[0];
    assert_eq!(token, "reply-token-1");
    assert!(text.contains("2024年03月分"));
    assert!(text.contains("$123.40"));
    assert!(text.contains("+$23.40"));

    let breakdown: Vec<_> = text.lines().filter(|l| l.starts_with("  ・")).collect();
    assert_eq!(
        breakdown,
        vec![
            "  ・EC2   : $ 60.00",
            "  ・CloudWatch : $ 25.00",
            "  ・Route53 : $ 14.38",
            "  ・S3    : $ 12.30",
            "  ・Tax   : $ 11.22",
        ]
    );

    let march = BillingWindow::new(date(2024, 3, 1), date(2024, 4, 1)).unwrap();
    let february = BillingWindow::new(date(2024, 2, 1), date(2024, 3, 1)).unwrap();
    assert_eq!(query.calls(), vec![(march, false), (february, false), (march, true)]);
}

#[tokio::test]
async fn test_previous_month_keyword_skips_diff() {
    let query = Arc::new(
        FakeCostQuery::default()
            .with(date(2023, 12, 1), false, total_report("42.00"))
            .with(date(2023, 12, 1), true, grouped_report(&[("AWS Lambda", "42.00")])),
    );
    let replier = FakeReplier::accepting();
    let bot = bot(query.clone(), replier.clone());

    let response = bot.handle_on(Some(webhook_body("先月").as_str()), date(2024, 1, 15)).await;

    assert_eq!(response.status_code, 200);
    let replies = replier.replies();
    let text = &replies[0].1;
    assert!(text.contains("2023年12月分"));
    assert!(text.contains("$42.00"));
    assert!(!text.contains("【前月差額】"));

    let december = BillingWindow::new(date(2023, 12, 1), date(2024, 1, 1)).unwrap();
    assert_eq!(query.calls(), vec![(december, false), (december, true)]);
}

#[tokio::test]
async fn test_help_keyword_skips_billing() {
    let query = Arc::new(FakeCostQuery::default());
    let replier = FakeReplier::accepting();
    let bot = bot(query.clone(), replier.clone());

    let response = bot.handle_on(Some(webhook_body(" Help ").as_str()), date(2024, 3, 15)).await;

    assert_eq!(response.status_code, 200);
    assert!(query.calls().is_empty());
    assert!(replier.replies()[0].1.starts_with("【目的】"));
}

#[tokio::test]
async fn test_empty_billing_result_fails_without_reply() {
    let query = Arc::new(FakeCostQuery::default());
    let replier = FakeReplier::accepting();
    let bot = bot(query, replier.clone());

    let response = bot.handle_on(Some(webhook_body("コスト").as_str()), date(2024, 3, 15)).await;

    assert_eq!(response.status_code, 500);
    assert!(!response.body.unwrap_or_default().is_empty());
    assert!(replier.replies().is_empty());
}

#[tokio::test]
async fn test_empty_breakdown_fails_without_reply() {
    let query = Arc::new(
        FakeCostQuery::default()
            .with(date(2024, 3, 1), false, total_report("1.00"))
            .with(date(2024, 2, 1), false, total_report("1.00"))
            .with(date(2024, 3, 1), true, grouped_report(&[])),
    );
    let replier = FakeReplier::accepting();
    let bot = bot(query, replier.clone());

    let response = bot.handle_on(Some(webhook_body("コスト").as_str()), date(2024, 3, 15)).await;

    assert_eq!(response.status_code, 500);
    assert!(replier.replies().is_empty());
}

#[tokio::test]
async fn test_rejected_reply_returns_fixed_message() {
    let query = Arc::new(march_account());
    let replier = FakeReplier::rejecting(400);
    let bot = bot(query, replier);

    let response = bot.handle_on(Some(webhook_body("コスト").as_str()), date(2024, 3, 15)).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(response.body.as_deref(), Some("Failed to send message to LINE"));
}

#[tokio::test]
async fn test_malformed_webhook_returns_error_text() {
    let replier = FakeReplier::accepting();
    let bot = bot(Arc::new(FakeCostQuery::default()), replier.clone());

    let missing_token = json!({ "events": [{ "message": { "text": "help" } }] }).to_string();
    let response = bot.handle_on(Some(missing_token.as_str()), date(2024, 3, 15)).await;
    assert_eq!(response.status_code, 500);
    assert!(response.body.unwrap().contains("replyToken"));

    let response = bot.handle_on(None, date(2024, 3, 15)).await;
    assert_eq!(response.status_code, 500);

    assert!(replier.replies().is_empty());
}
