//! Billing period resolution
//!
//! Turns "today" and the requested mode into the month window(s) to query.

use chrono::{Datelike, Months, NaiveDate};
use costbot_core::{CostBotError, Result};

use crate::types::BillingWindow;

/// Which month the user asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    /// This month, compared against the previous one.
    CurrentMonth,
    /// Last month only, no comparison.
    PreviousMonth,
}

/// Resolved windows for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPeriod {
    pub primary: BillingWindow,
    /// Window to diff against; `None` when no diff was requested.
    pub previous: Option<BillingWindow>,
}

impl BillingPeriod {
    pub fn resolve(today: NaiveDate, mode: BillingMode) -> Result<Self> {
        let this_month = first_of_month(today)?;

        match mode {
            BillingMode::CurrentMonth => {
                let next_month = shift_months(this_month, 1)?;
                let last_month = shift_months(this_month, -1)?;
                Ok(Self {
                    primary: BillingWindow::new(this_month, next_month)?,
                    previous: Some(BillingWindow::new(last_month, this_month)?),
                })
            }
            BillingMode::PreviousMonth => {
                let last_month = shift_months(this_month, -1)?;
                Ok(Self {
                    primary: BillingWindow::new(last_month, this_month)?,
                    previous: None,
                })
            }
        }
    }

    pub fn shows_diff(&self) -> bool {
        self.previous.is_some()
    }

    /// e.g. `2024年03月分`
    pub fn label(&self) -> String {
        self.primary.start().format("%Y年%m月分").to_string()
    }
}

fn first_of_month(date: NaiveDate) -> Result<NaiveDate> {
    date.with_day(1)
        .ok_or_else(|| CostBotError::Internal(format!("No first day for {}", date)))
}

fn shift_months(date: NaiveDate, months: i32) -> Result<NaiveDate> {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.ok_or_else(|| CostBotError::Internal(format!("Date out of range shifting {}", date)))
}
