//! Cost Bot Types

use chrono::{Datelike, NaiveDate};
use costbot_core::{CostBotError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open date interval `[start, end)` whose start is the first of a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct BillingWindow {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawWindow> for BillingWindow {
    type Error = CostBotError;

    fn try_from(raw: RawWindow) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl BillingWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(CostBotError::Internal(format!(
                "Billing window start {} is not before end {}",
                start, end
            )));
        }
        if start.day() != 1 {
            return Err(CostBotError::Internal(format!(
                "Billing window must start on the first of a month, got {}",
                start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// `YYYY-MM-DD`, the format the billing API expects.
    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for BillingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Cost attributed to one service within a window
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCost {
    pub name: String,
    pub amount: Decimal,
}

impl ServiceCost {
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        Self { name: name.into(), amount }
    }
}

/// Everything the invoice message is rendered from
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub period_label: String,
    pub total: Decimal,
    pub breakdown: Vec<ServiceCost>,
    /// Present only when the previous month was queried for comparison.
    pub delta: Option<Decimal>,
}
