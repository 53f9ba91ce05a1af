//! Payment models for retail-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One money movement against an invoice. Positive amount = charge,
/// negative = refund. Payment history is append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentRecord {
    pub method: String,
    pub amount: Decimal,
    pub paid_at: DateTime<Utc>,
}

/// Input for recording a refund.
#[derive(Debug, Clone)]
pub struct RefundRequest {
    pub invoice_id: i32,
    /// Positive amount as entered by the user; persisted negated.
    pub amount: Decimal,
}

/// Outcome of a recorded refund.
#[derive(Debug, Clone)]
pub struct RefundReceipt {
    pub invoice_id: i32,
    /// The positive amount that was requested.
    pub amount: Decimal,
    /// Sum of line totals at the time of the refund.
    pub billed: Decimal,
    /// Net paid before this refund was applied.
    pub paid_before: Decimal,
    /// True when the refund exceeds the net paid so far. A warning, never
    /// a block.
    pub over_refund: bool,
}
