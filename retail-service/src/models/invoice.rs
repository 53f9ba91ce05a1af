//! Invoice models for retail-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::PaymentRecord;

/// One row of the admin invoice listing.
///
/// `has_refund` is derived per row via an EXISTS check on negative
/// payments; it is never stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvoiceSummary {
    pub invoice_id: i32,
    pub customer_name: String,
    pub has_refund: bool,
}

/// Invoice header as shown at the top of the detail view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvoiceHeader {
    pub invoice_id: i32,
    pub customer_name: String,
    pub invoice_date: DateTime<Utc>,
    pub status: String,
    pub ship_to_country: Option<String>,
}

/// One line item in the detail view, price frozen at order time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvoiceLineDetail {
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Full invoice detail: header, line items, and payment history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub header: InvoiceHeader,
    pub lines: Vec<InvoiceLineDetail>,
    pub payments: Vec<PaymentRecord>,
}

/// Billed and paid aggregates for one invoice, both zero when no rows exist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, FromRow)]
pub struct InvoiceTotals {
    pub billed: Decimal,
    pub paid: Decimal,
}
