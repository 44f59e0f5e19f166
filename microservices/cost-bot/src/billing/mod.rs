//! Billing data adapter
//!
//! Issues read-only cost queries and pulls the total or the per-service
//! ranking out of the raw response. Missing data is always an error: a
//! zero bill has to stay distinguishable from an unavailable one.

pub mod cost_explorer;

use async_trait::async_trait;
use costbot_core::{CostBotError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::types::{BillingWindow, ServiceCost};

pub use cost_explorer::CostExplorerQuery;

/// Metric every query selects.
pub const COST_METRIC: &str = "BlendedCost";
/// Dimension used for the per-service breakdown.
pub const SERVICE_DIMENSION: &str = "SERVICE";

/// Raw query response, shaped like Cost Explorer's `GetCostAndUsage` output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostReport {
    #[serde(default)]
    pub results_by_time: Vec<ResultByTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultByTime {
    #[serde(default)]
    pub total: HashMap<String, MetricValue>,
    #[serde(default)]
    pub groups: Vec<CostGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostGroup {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub metrics: HashMap<String, MetricValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricValue {
    pub amount: Option<String>,
    pub unit: Option<String>,
}

/// The external billing query: monthly granularity, [`COST_METRIC`],
/// optionally grouped by [`SERVICE_DIMENSION`].
#[async_trait]
pub trait CostQuery: Send + Sync {
    async fn get_cost_and_usage(
        &self,
        window: &BillingWindow,
        group_by_service: bool,
    ) -> Result<CostReport>;
}

#[derive(Clone)]
pub struct BillingClient {
    query: Arc<dyn CostQuery>,
}

impl BillingClient {
    pub fn new(query: Arc<dyn CostQuery>) -> Self {
        Self { query }
    }

    /// Total spend over `window`.
    pub async fn fetch_total(&self, window: &BillingWindow) -> Result<Decimal> {
        let report = self.query.get_cost_and_usage(window, false).await?;
        let total = extract_total_amount(&report)?;
        debug!(window = %window, total = %total, "Fetched cost total");
        Ok(total)
    }

    /// Top `top_n` services by spend over `window`, most expensive first.
    pub async fn fetch_breakdown(
        &self,
        window: &BillingWindow,
        top_n: usize,
    ) -> Result<Vec<ServiceCost>> {
        let report = self.query.get_cost_and_usage(window, true).await?;
        let breakdown = extract_service_breakdown(&report, top_n)?;
        debug!(window = %window, services = breakdown.len(), "Fetched service breakdown");
        Ok(breakdown)
    }
}

pub fn extract_total_amount(report: &CostReport) -> Result<Decimal> {
    let period = first_period(report)?;
    let metric = period.total.get(COST_METRIC).ok_or_else(|| {
        CostBotError::Billing(format!("Total is missing the {} metric", COST_METRIC))
    })?;
    parse_amount(metric)
}

/// Sorts descending by amount, keeping input order on ties, and keeps `top_n`.
pub fn extract_service_breakdown(report: &CostReport, top_n: usize) -> Result<Vec<ServiceCost>> {
    let period = first_period(report)?;
    if period.groups.is_empty() {
        return Err(CostBotError::Billing("Service breakdown is empty".to_string()));
    }

    let mut services = period
        .groups
        .iter()
        .map(|group| -> Result<ServiceCost> {
            let name = group
                .keys
                .first()
                .ok_or_else(|| CostBotError::Billing("Cost group has no key".to_string()))?;
            let metric = group.metrics.get(COST_METRIC).ok_or_else(|| {
                CostBotError::Billing(format!("{} is missing the {} metric", name, COST_METRIC))
            })?;
            Ok(ServiceCost::new(name.clone(), parse_amount(metric)?))
        })
        .collect::<Result<Vec<_>>>()?;

    services.sort_by(|a, b| b.amount.cmp(&a.amount));
    services.truncate(top_n);
    Ok(services)
}

fn first_period(report: &CostReport) -> Result<&ResultByTime> {
    report
        .results_by_time
        .first()
        .ok_or_else(|| CostBotError::Billing("No results returned for the period".to_string()))
}

fn parse_amount(metric: &MetricValue) -> Result<Decimal> {
    let raw = metric
        .amount
        .as_deref()
        .ok_or_else(|| CostBotError::Billing("Metric has no amount".to_string()))?;
    Decimal::from_str(raw.trim())
        .or_else(|_| Decimal::from_scientific(raw.trim()))
        .map_err(|e| CostBotError::Billing(format!("Invalid amount {:?}: {}", raw, e)))
}
