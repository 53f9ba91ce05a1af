//! Reporting models for retail-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the best-selling products ranking.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BestSeller {
    pub sku: String,
    pub name: String,
    pub units: i64,
    pub sales: Decimal,
}

/// Gross revenue attributed to one customer country.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CountryRevenue {
    pub country: String,
    pub revenue: Decimal,
}
