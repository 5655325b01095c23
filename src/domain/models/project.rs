use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Hourly,
    Daily,
    Fixed,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WageUnit {
    Hour,
    Day,
    Total,
}

impl WageUnit {
    /// Unit and payment type are a 1:1 mapping; the unit is what the user
    /// entered, the payment type is how the project settles.
    pub fn payment_type(self) -> PaymentType {
        match self {
            WageUnit::Hour => PaymentType::Hourly,
            WageUnit::Day => PaymentType::Daily,
            WageUnit::Total => PaymentType::Fixed,
        }
    }
}

impl PaymentType {
    pub fn wage_unit(self) -> WageUnit {
        match self {
            PaymentType::Hourly => WageUnit::Hour,
            PaymentType::Daily => WageUnit::Day,
            PaymentType::Fixed => WageUnit::Total,
        }
    }
}

/// A company's posting. `daily_wage` is the canonical 8-hour-day figure and
/// is only ever written through the wage normalizer, so it can never diverge
/// from `original_wage` + `wage_unit`.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Project {
    pub id: String,
    pub company_id: String,
    pub title: String,
    pub payment_type: PaymentType,
    pub original_wage: f64,
    pub daily_wage: f64,
    pub wage_unit: WageUnit,
    pub required_workers: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

pub struct NewProjectParams {
    pub company_id: String,
    pub title: String,
    pub payment_type: PaymentType,
    pub original_wage: f64,
    pub daily_wage: f64,
    pub required_workers: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Project {
    pub fn new(params: NewProjectParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            company_id: params.company_id,
            title: params.title,
            payment_type: params.payment_type,
            original_wage: params.original_wage,
            daily_wage: params.daily_wage,
            wage_unit: params.payment_type.wage_unit(),
            required_workers: params.required_workers,
            start_date: params.start_date,
            end_date: params.end_date,
            created_at: Utc::now(),
        }
    }
}
