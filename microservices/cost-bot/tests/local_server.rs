//! Local Server Integration Tests
//!
//! Serves the router on an ephemeral port and checks the health and readiness endpoints

use async_trait::async_trait;
use cost_bot::{
    api, BillingClient, BillingWindow, CostBot, CostQuery, CostReport, CredentialCache,
    ReplySender, SecretStore,
};
use costbot_core::Result;
use std::sync::Arc;

struct NoBilling;

#[async_trait]
impl CostQuery for NoBilling {
    async fn get_cost_and_usage(&self, _: &BillingWindow, _: bool) -> Result<CostReport> {
        Ok(CostReport::default())
    }
}

struct NoReply;

#[async_trait]
impl ReplySender for NoReply {
    async fn reply_text(&self, _: &str, _: &str) -> Result<()> {
        Ok(())
    }
}

struct FixedSecret;

#[async_trait]
impl SecretStore for FixedSecret {
    async fn secret_string(&self, _: &str) -> Result<String> {
        Ok(r#"{"LINE_ACCESS_TOKEN":"channel-token"}"#.to_string())
    }
}

async fn serve() -> (String, Arc<CredentialCache>) {
    let credentials = Arc::new(CredentialCache::new(
        Arc::new(FixedSecret),
        "linebot/credentials",
        "LINE_ACCESS_TOKEN",
    ));
    let bot = CostBot::new(BillingClient::new(Arc::new(NoBilling)), Arc::new(NoReply), 5);
    let router = api::rest::create_router(bot, credentials.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), credentials)
}

#[tokio::test]
async fn test_health_reports_service() {
    let (base, _credentials) = serve().await;

    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["healthy"], true);
    assert_eq!(body["service_id"], "cost-bot");
}

#[tokio::test]
async fn test_ready_waits_for_credentials() {
    let (base, credentials) = serve().await;

    let response = reqwest::get(format!("{}/ready", base)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ready"], false);
    assert_eq!(body["dependencies"][0]["name"], "line-credentials");

    credentials.warm_up().await.unwrap();

    let response = reqwest::get(format!("{}/ready", base)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["dependencies"][0]["available"], true);
}
