//! Product model for retail-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog product. Only active products are browsable and orderable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: i32,
    pub sku: String,
    pub name: String,
    pub unit_price: Decimal,
    pub is_active: bool,
}
