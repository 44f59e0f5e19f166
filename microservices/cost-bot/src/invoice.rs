//! Invoice message rendering
//!
//! Produces the fixed-width text block sent back to the chat. The layout
//! is relied on by existing readers: the rule is 13 characters wide and
//! service names are padded to 5 characters but never truncated, so long
//! aliases overflow their column.

use rust_decimal::Decimal;

use crate::service_map::short_name;
use crate::types::{Invoice, ServiceCost};

pub const FIXED_WIDTH: usize = 13;
pub const RULE_CHAR: char = '─';
pub const TITLE: &str = "AWS利用料請求書";
pub const NAME_FIELD_WIDTH: usize = 5;

impl Invoice {
    pub fn render(&self) -> String {
        render_invoice(&self.period_label, self.total, &self.breakdown, self.delta)
    }
}

pub fn render_invoice(
    period_label: &str,
    total: Decimal,
    breakdown: &[ServiceCost],
    delta: Option<Decimal>,
) -> String {
    let sep = RULE_CHAR.to_string().repeat(FIXED_WIDTH);

    let mut parts = vec![sep.clone(), center(TITLE, FIXED_WIDTH), sep.clone()];

    parts.push("【請求期間】".to_string());
    parts.push(period_label.to_string());
    parts.push(String::new());
    parts.push("【合計金額】".to_string());
    parts.push(format!("${}", money(total)));
    if let Some(delta) = delta {
        parts.push(String::new());
        parts.push("【前月差額】".to_string());
        parts.push(signed_money(delta));
    }

    parts.push(sep.clone());
    parts.push("【内訳】".to_string());
    for service in breakdown {
        parts.push(format!(
            "  ・{:<width$} : $ {}",
            short_name(&service.name),
            money(service.amount),
            width = NAME_FIELD_WIDTH
        ));
    }
    parts.push(sep);

    parts.join("\n")
}

/// Two fractional digits, half-to-even. A negative amount keeps its sign
/// even when it rounds to zero, so a tiny credit reads `-0.00`.
pub fn money(amount: Decimal) -> String {
    let digits = format!("{:.2}", amount.abs().round_dp(2));
    if amount < Decimal::ZERO {
        format!("-{}", digits)
    } else {
        digits
    }
}

/// `+$x.xx` for zero and above, `-$x.xx` otherwise.
pub fn signed_money(delta: Decimal) -> String {
    let sign = if delta >= Decimal::ZERO { '+' } else { '-' };
    format!("{}${}", sign, money(delta.abs()))
}

/// Centres by character count; with an odd margin and odd width the extra
/// space goes on the left.
fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let margin = width - len;
    let left = margin / 2 + (margin & width & 1);
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(margin - left))
}
