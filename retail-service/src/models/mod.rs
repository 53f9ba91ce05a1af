//! Domain models for retail-service.

mod customer;
mod invoice;
mod order;
mod payment;
mod product;
mod report;

pub use customer::Customer;
pub use invoice::{InvoiceDetail, InvoiceHeader, InvoiceLineDetail, InvoiceSummary, InvoiceTotals};
pub use order::{AcceptedLine, OrderLineRequest, PlaceOrderRequest, PlacedOrder, RejectedLine, RejectionReason};
pub use payment::{PaymentRecord, RefundReceipt, RefundRequest};
pub use product::Product;
pub use report::{BestSeller, CountryRevenue};
