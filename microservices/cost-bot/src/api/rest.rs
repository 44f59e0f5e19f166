//! Local webhook REST API

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use costbot_core::{DependencyStatus, HealthStatus, ReadinessStatus};
use std::sync::Arc;
use std::time::Instant;

use crate::credentials::CredentialCache;
use crate::handler::{CostBot, HandlerResponse};

pub const SERVICE_ID: &str = "cost-bot";

#[derive(Clone)]
pub struct AppState {
    pub bot: CostBot,
    pub credentials: Arc<CredentialCache>,
    pub started: Instant,
}

pub fn create_router(bot: CostBot, credentials: Arc<CredentialCache>) -> Router {
    let state = AppState { bot, credentials, started: Instant::now() };

    Router::new()
        // Health
        .route("/health", get(health))
        .route("/ready", get(ready))
        // LINE webhook
        .route("/webhook", post(webhook))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(health_status(state.started))
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadinessStatus>) {
    let status = readiness(state.credentials.is_loaded());
    let code = if status.ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (code, Json(status))
}

async fn webhook(State(state): State<AppState>, body: String) -> Response {
    let response = state.bot.handle_on(Some(body.as_str()), Utc::now().date_naive()).await;
    into_http(response)
}

fn health_status(started: Instant) -> HealthStatus {
    HealthStatus {
        healthy: true,
        service_id: SERVICE_ID.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: started.elapsed().as_secs(),
    }
}

/// Ready once the LINE access token has been read.
fn readiness(credentials_loaded: bool) -> ReadinessStatus {
    ReadinessStatus {
        ready: credentials_loaded,
        dependencies: vec![DependencyStatus {
            name: "line-credentials".to_string(),
            available: credentials_loaded,
            latency_ms: None,
        }],
    }
}

fn into_http(response: HandlerResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match response.body {
        Some(body) => (status, body).into_response(),
        None => status.into_response(),
    }
}
