//! Cost Bot entry point
//!
//! Runs under the Lambda runtime when `AWS_LAMBDA_RUNTIME_API` is set,
//! otherwise serves the webhook over HTTP for local use.

use cost_bot::{
    api, BillingClient, CostBot, CostExplorerQuery, CredentialCache, InvocationEvent,
    LineReplyClient, SecretsManagerStore,
};
use costbot_core::{
    telemetry, BotConfig, BotService, CostBotError, Result, ServiceRuntime, TelemetryConfig,
};
use lambda_runtime::{service_fn, LambdaEvent};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = BotConfig::from_env()?;
    telemetry::init(&config.service_name, &TelemetryConfig::from_env())?;

    info!("Starting Cost Bot");

    let app = CostBotApp::new(config).await;

    // A failure here is retried on the first request.
    if let Err(e) = app.credentials.warm_up().await {
        warn!(error = %e, "Credential warm-up failed");
    }

    if std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        run_lambda(app.bot).await
    } else {
        ServiceRuntime::run(Arc::new(app)).await
    }
}

async fn run_lambda(bot: CostBot) -> Result<()> {
    let bot = Arc::new(bot);
    lambda_runtime::run(service_fn(move |event: LambdaEvent<InvocationEvent>| {
        let bot = bot.clone();
        async move { Ok::<_, lambda_runtime::Error>(bot.handle(&event.payload).await) }
    }))
    .await
    .map_err(|e| CostBotError::Internal(format!("Lambda runtime error: {}", e)))
}

pub struct CostBotApp {
    config: BotConfig,
    bot: CostBot,
    credentials: Arc<CredentialCache>,
}

impl CostBotApp {
    pub async fn new(config: BotConfig) -> Self {
        let secrets = Arc::new(SecretsManagerStore::with_region(&config.region).await);
        let credentials = Arc::new(CredentialCache::new(
            secrets,
            config.secret_name.clone(),
            config.token_field.clone(),
        ));

        let query = Arc::new(CostExplorerQuery::with_region(&config.cost_explorer_region).await);
        let replier = Arc::new(LineReplyClient::new(
            config.reply_endpoint.clone(),
            credentials.clone(),
        ));
        let bot = CostBot::new(BillingClient::new(query), replier, config.top_n);

        Self { config, bot, credentials }
    }
}

#[async_trait::async_trait]
impl BotService for CostBotApp {
    fn service_id(&self) -> &'static str {
        api::rest::SERVICE_ID
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down Cost Bot");
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        info!(http = %self.config.http_bind, "Starting webhook server");

        let router = api::rest::create_router(self.bot.clone(), self.credentials.clone());

        let listener = tokio::net::TcpListener::bind(&self.config.http_bind).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
