//! Package plan (service tier) model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Service tier, joined to accounts by `profile_name`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PackagePlan {
    pub id: i64,
    pub name: String,
    pub pool_name: Option<String>,
    pub profile_name: String,
    pub price: Decimal,
    pub currency: String,
    pub is_active: bool,
    pub created_date: DateTime<Utc>,
}
