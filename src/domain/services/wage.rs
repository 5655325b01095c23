use serde::Serialize;

use crate::domain::models::project::{PaymentType, WageUnit};
use crate::error::AppError;

pub const HOURS_PER_DAY: f64 = 8.0;

/// Converts a user-entered wage into the canonical daily figure. An hourly
/// wage scales by the 8-hour day; a daily wage is already canonical; a total
/// price is kept as a single non-recurring figure, never divided by duration.
pub fn to_canonical_daily(amount: f64, unit: WageUnit) -> Result<f64, AppError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::Validation(format!("Invalid wage amount: {}", amount)));
    }
    Ok(match unit {
        WageUnit::Hour => amount * HOURS_PER_DAY,
        WageUnit::Day => amount,
        WageUnit::Total => amount,
    })
}

/// Unit-specific display string, e.g. "50元/小时", "400元/天", "5000元(总价)".
pub fn to_display(amount: f64, unit: WageUnit) -> String {
    let amount = format_amount(amount);
    match unit {
        WageUnit::Hour => format!("{}元/小时", amount),
        WageUnit::Day => format!("{}元/天", amount),
        WageUnit::Total => format!("{}元(总价)", amount),
    }
}

/// Uniform hourly comparison figure. For hourly projects this is the entered
/// amount itself; for daily projects the canonical figure divided by the
/// 8-hour day. A fixed-price job has no defined hourly rate, so `None` is
/// returned rather than a fabricated number.
pub fn hourly_rate(daily_wage: f64, payment_type: PaymentType, original_wage: f64) -> Option<f64> {
    match payment_type {
        PaymentType::Hourly => Some(original_wage),
        PaymentType::Daily => Some(daily_wage / HOURS_PER_DAY),
        PaymentType::Fixed => None,
    }
}

fn format_amount(amount: f64) -> String {
    if (amount - amount.round()).abs() < 1e-9 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

/// The wage shape every API payload carries. Computed server-side so clients
/// never redo unit conversions themselves.
#[derive(Debug, Serialize, Clone)]
pub struct WageView {
    pub amount: f64,
    pub unit: WageUnit,
    pub payment_type: PaymentType,
    pub hourly_rate: Option<f64>,
    pub display_string: String,
}

impl WageView {
    pub fn build(original_wage: f64, unit: WageUnit, daily_wage: f64) -> Self {
        let payment_type = unit.payment_type();
        Self {
            amount: original_wage,
            unit,
            payment_type,
            hourly_rate: hourly_rate(daily_wage, payment_type, original_wage),
            display_string: to_display(original_wage, unit),
        }
    }
}
