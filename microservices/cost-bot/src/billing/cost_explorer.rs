//! AWS Cost Explorer implementation of [`CostQuery`]

use async_trait::async_trait;
use aws_sdk_costexplorer::{
    error::DisplayErrorContext,
    operation::get_cost_and_usage::GetCostAndUsageOutput,
    types::{DateInterval, Granularity, GroupDefinition, GroupDefinitionType},
    Client,
};
use costbot_core::{CostBotError, Result};
use std::collections::HashMap;
use tracing::info;

use super::{CostGroup, CostQuery, CostReport, MetricValue, ResultByTime, COST_METRIC, SERVICE_DIMENSION};
use crate::types::BillingWindow;

pub struct CostExplorerQuery {
    client: Client,
}

impl CostExplorerQuery {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Cost Explorer has a single endpoint region, independent of where the bot runs.
    pub async fn with_region(region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl CostQuery for CostExplorerQuery {
    async fn get_cost_and_usage(
        &self,
        window: &BillingWindow,
        group_by_service: bool,
    ) -> Result<CostReport> {
        info!(
            start = %window.start_param(),
            end = %window.end_param(),
            group_by_service,
            "Querying Cost Explorer"
        );

        let mut request = self
            .client
            .get_cost_and_usage()
            .time_period(date_interval(window)?)
            .granularity(Granularity::Monthly)
            .metrics(COST_METRIC);

        if group_by_service {
            request = request.group_by(
                GroupDefinition::builder()
                    .r#type(GroupDefinitionType::Dimension)
                    .key(SERVICE_DIMENSION)
                    .build(),
            );
        }

        let output = request.send().await.map_err(|e| {
            CostBotError::Billing(format!(
                "Failed to query AWS Cost Explorer: {}",
                DisplayErrorContext(&e)
            ))
        })?;

        Ok(report_from_output(&output))
    }
}

fn date_interval(window: &BillingWindow) -> Result<DateInterval> {
    DateInterval::builder()
        .start(window.start_param())
        .end(window.end_param())
        .build()
        .map_err(|e| CostBotError::Billing(format!("Failed to build date interval: {}", e)))
}

fn report_from_output(output: &GetCostAndUsageOutput) -> CostReport {
    CostReport {
        results_by_time: output
            .results_by_time()
            .iter()
            .map(|result| ResultByTime {
                total: result.total().map(convert_metrics).unwrap_or_default(),
                groups: result
                    .groups()
                    .iter()
                    .map(|group| CostGroup {
                        keys: group.keys().to_vec(),
                        metrics: group.metrics().map(convert_metrics).unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn convert_metrics(
    metrics: &HashMap<String, aws_sdk_costexplorer::types::MetricValue>,
) -> HashMap<String, MetricValue> {
    metrics
        .iter()
        .map(|(name, value)| {
            (
                name.clone(),
                MetricValue {
                    amount: value.amount().map(str::to_string),
                    unit: value.unit().map(str::to_string),
                },
            )
        })
        .collect()
}
