//! Customer model for retail-service.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Customer as shown in the short pick-list before order placement.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub customer_id: i32,
    pub full_name: String,
}
