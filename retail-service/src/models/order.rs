//! Order placement request and outcome models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One requested order line, as gathered by the input adapter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub product_id: i32,
    pub quantity: i32,
}

/// Fully-formed order placement request.
///
/// The handler is input-source agnostic: the console gathers these fields
/// interactively, a test harness constructs them directly.
#[derive(Debug, Clone)]
pub struct PlaceOrderRequest {
    pub customer_id: i32,
    pub lines: Vec<OrderLineRequest>,
    /// Payment method, already defaulted and uppercased by the adapter.
    pub payment_method: String,
}

/// Why a requested line was skipped. Skipped lines never abort the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// Quantity was zero or negative.
    BadQuantity,
    /// Product id did not resolve to an active product.
    ProductNotActive,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::BadQuantity => "quantity must be a positive integer",
            RejectionReason::ProductNotActive => "product not found or not active",
        }
    }
}

/// A line that was accepted and persisted.
#[derive(Debug, Clone)]
pub struct AcceptedLine {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// A line that was skipped, with the reason.
#[derive(Debug, Clone)]
pub struct RejectedLine {
    pub line: OrderLineRequest,
    pub reason: RejectionReason,
}

/// Outcome of order placement.
#[derive(Debug, Clone)]
pub enum PlacedOrder {
    /// Every requested line was rejected (or none were requested); the
    /// provisional invoice was deleted and nothing persists.
    Empty { rejected: Vec<RejectedLine> },
    /// Invoice, lines, and a single payment for the subtotal persisted.
    Paid {
        invoice_id: i32,
        accepted: Vec<AcceptedLine>,
        rejected: Vec<RejectedLine>,
        subtotal: Decimal,
        payment_method: String,
    },
}
