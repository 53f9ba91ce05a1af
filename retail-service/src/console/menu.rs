//! Menu loop and interactive flows.
//!
//! The loop is the recovery boundary: every operation error is rendered as
//! one line and control returns to the enclosing menu. Only end of input or
//! a console write failure unwinds further.

use crate::config::Config;
use crate::console::input::{normalize_method, parse_amount, parse_id, parse_quantity};
use crate::console::Console;
use crate::models::{OrderLineRequest, PlaceOrderRequest, PlacedOrder, RefundRequest};
use crate::services::Database;
use retail_core::error::AppError;
use tokio::io::{AsyncBufRead, AsyncWrite};

/// Top-level menu: choose role. Returns when the user exits or input ends.
pub async fn run<R, W>(
    console: &mut Console<R, W>,
    db: &Database,
    config: &Config,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        console.say("\n=== Online Retail System ===").await?;
        console.say("1. Customer Menu").await?;
        console.say("2. Admin Menu").await?;
        console.say("0. Exit").await?;

        let Some(choice) = console.prompt("Enter choice: ").await? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => customer_menu(console, db, config).await?,
            "2" => admin_menu(console, db).await?,
            "0" => {
                console.say("Bye!").await?;
                return Ok(());
            }
            _ => console.say("Invalid choice, please try again.").await?,
        }
    }
}

async fn customer_menu<R, W>(
    console: &mut Console<R, W>,
    db: &Database,
    config: &Config,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        console.say("\n=== Customer Menu ===").await?;
        console.say("1. Browse Products").await?;
        console.say("2. Place Order & Pay").await?;
        console.say("3. Process Refund").await?;
        console.say("0. Back").await?;

        let Some(choice) = console.prompt("Enter choice: ").await? else {
            return Ok(());
        };

        let result = match choice.as_str() {
            "1" => browse_products(console, db).await,
            "2" => place_order(console, db, config).await,
            "3" => process_refund(console, db).await,
            "0" => return Ok(()),
            _ => {
                console.say("Invalid choice, please try again.").await?;
                continue;
            }
        };

        report(console, result).await?;
    }
}

async fn admin_menu<R, W>(console: &mut Console<R, W>, db: &Database) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        console.say("\n=== Admin Menu ===").await?;
        console.say("1. View All Invoices and Details").await?;
        console.say("2. View Revenue and Total Net Profit").await?;
        console.say("3. View Best-selling Products").await?;
        console.say("0. Back").await?;

        let Some(choice) = console.prompt("Enter choice: ").await? else {
            return Ok(());
        };

        let result = match choice.as_str() {
            "1" => view_invoices(console, db).await,
            "2" => view_revenue_and_net_profit(console, db).await,
            "3" => view_best_sellers(console, db).await,
            "0" => return Ok(()),
            _ => {
                console.say("Invalid choice, please try again.").await?;
                continue;
            }
        };

        report(console, result).await?;
    }
}

/// One error maps to one user-facing message; the menu continues.
async fn report<R, W>(
    console: &mut Console<R, W>,
    result: Result<(), AppError>,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if let Err(e) = result {
        console.say(&format!("Error: {e}")).await?;
    }
    Ok(())
}

// -------------------------------------------------------------------------
// Customer flows
// -------------------------------------------------------------------------

async fn browse_products<R, W>(console: &mut Console<R, W>, db: &Database) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let products = db.list_products().await?;

    console.say("\n=== Product List ===").await?;
    console
        .say(&format!(
            "{:<5} {:<10} {:<30} {:>10}",
            "ID", "SKU", "Name", "Price"
        ))
        .await?;
    console.say(&"-".repeat(60)).await?;
    for p in &products {
        console
            .say(&format!(
                "{:<5} {:<10} {:<30} {:>10.2}",
                p.product_id, p.sku, p.name, p.unit_price
            ))
            .await?;
    }
    Ok(())
}

/// Gather customer, lines until blank, and payment method in that order,
/// then hand the fully-formed request to the database service.
async fn place_order<R, W>(
    console: &mut Console<R, W>,
    db: &Database,
    config: &Config,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let customers = db.list_customers().await?;
    console.say("\n=== Customers ===").await?;
    for c in &customers {
        console
            .say(&format!("{}: {}", c.customer_id, c.full_name))
            .await?;
    }

    let Some(raw) = console.prompt("\nEnter customer ID: ").await? else {
        return Ok(());
    };
    let Some(customer_id) = parse_id(&raw) else {
        console.say("Invalid customer ID.").await?;
        return Ok(());
    };

    let mut lines = Vec::new();
    loop {
        console
            .say("\nAdd an order line (leave product ID empty to finish).")
            .await?;
        let Some(prod_raw) = console.prompt("Product ID: ").await? else {
            break;
        };
        if prod_raw.is_empty() {
            break;
        }
        let Some(product_id) = parse_id(&prod_raw) else {
            console.say("Invalid product ID.").await?;
            continue;
        };

        let Some(qty_raw) = console.prompt("Quantity: ").await? else {
            break;
        };
        let Some(quantity) = parse_quantity(&qty_raw) else {
            console.say("Quantity must be a positive integer.").await?;
            continue;
        };

        lines.push(OrderLineRequest {
            product_id,
            quantity,
        });
    }

    let payment_method = if lines.is_empty() {
        // Nothing to pay for; the handler still runs to keep the
        // all-rejected case a clean no-op.
        "CARD".to_string()
    } else {
        let raw = console
            .prompt("Payment method (default CARD): ")
            .await?
            .unwrap_or_default();
        normalize_method(&raw)
    };

    let request = PlaceOrderRequest {
        customer_id,
        lines,
        payment_method,
    };

    match db.place_order(&request, &config.currency).await? {
        PlacedOrder::Empty { rejected } => {
            for r in &rejected {
                console
                    .say(&format!(
                        "Skipped product {}: {}.",
                        r.line.product_id,
                        r.reason.as_str()
                    ))
                    .await?;
            }
            console.say("No order lines accepted, invoice cancelled.").await?;
        }
        PlacedOrder::Paid {
            invoice_id,
            accepted,
            rejected,
            subtotal,
            payment_method,
        } => {
            for a in &accepted {
                console
                    .say(&format!(
                        "Added line: product {}, qty {}, line total {:.2}.",
                        a.product_id, a.quantity, a.line_total
                    ))
                    .await?;
            }
            for r in &rejected {
                console
                    .say(&format!(
                        "Skipped product {}: {}.",
                        r.line.product_id,
                        r.reason.as_str()
                    ))
                    .await?;
            }
            console
                .say(&format!("\nOrder subtotal: {subtotal:.2}"))
                .await?;
            console
                .say(&format!(
                    "Order placed and paid successfully. Invoice #{invoice_id}, amount {subtotal:.2}, method {payment_method}."
                ))
                .await?;
        }
    }
    Ok(())
}

async fn process_refund<R, W>(console: &mut Console<R, W>, db: &Database) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(raw) = console.prompt("Enter invoice ID to refund: ").await? else {
        return Ok(());
    };
    let Some(invoice_id) = parse_id(&raw) else {
        console.say("Invalid invoice ID.").await?;
        return Ok(());
    };

    let totals = db.invoice_totals(invoice_id).await?;
    console
        .say(&format!(
            "\nInvoice #{invoice_id}: billed = {:.2}, paid so far = {:.2}",
            totals.billed, totals.paid
        ))
        .await?;

    let Some(amt_raw) = console.prompt("Refund amount: ").await? else {
        return Ok(());
    };
    let Some(amount) = parse_amount(&amt_raw) else {
        console.say("Refund amount must be a positive number.").await?;
        return Ok(());
    };

    let receipt = db
        .record_refund(&RefundRequest { invoice_id, amount })
        .await?;

    if receipt.over_refund {
        console
            .say("Warning: refund is greater than total payments, but will continue anyway.")
            .await?;
    }
    console
        .say(&format!(
            "Refund of {:.2} recorded for invoice #{invoice_id}.",
            receipt.amount
        ))
        .await?;
    Ok(())
}

// -------------------------------------------------------------------------
// Admin flows
// -------------------------------------------------------------------------

async fn view_invoices<R, W>(console: &mut Console<R, W>, db: &Database) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let invoices = db.list_invoices().await?;

    console.say("\n=== All Invoices ===").await?;
    console
        .say(&format!("{:<5} {:<25} {:<10}", "ID", "Customer", "Refund?"))
        .await?;
    console.say(&"-".repeat(45)).await?;
    for inv in &invoices {
        let flag = if inv.has_refund { "Y" } else { "N" };
        console
            .say(&format!(
                "{:<5} {:<25} {:<10}",
                inv.invoice_id, inv.customer_name, flag
            ))
            .await?;
    }

    let Some(raw) = console
        .prompt("\nEnter invoice ID to view details (blank to return): ")
        .await?
    else {
        return Ok(());
    };
    if raw.is_empty() {
        return Ok(());
    }
    let Some(invoice_id) = parse_id(&raw) else {
        console.say("Invalid invoice ID.").await?;
        return Ok(());
    };

    let Some(detail) = db.invoice_detail(invoice_id).await? else {
        console.say("Invoice not found.").await?;
        return Ok(());
    };

    console.say("\n=== Invoice Details ===").await?;
    console
        .say(&format!("Invoice ID   : {}", detail.header.invoice_id))
        .await?;
    console
        .say(&format!("Customer     : {}", detail.header.customer_name))
        .await?;
    console
        .say(&format!("Date         : {}", detail.header.invoice_date))
        .await?;
    console
        .say(&format!("Status       : {}", detail.header.status))
        .await?;
    console
        .say(&format!(
            "Ship To      : {}",
            detail.header.ship_to_country.as_deref().unwrap_or("-")
        ))
        .await?;

    console.say("\n--- Items ---").await?;
    console
        .say(&format!(
            "{:<30} {:>8} {:>10} {:>12}",
            "Product", "Qty", "Price", "Total"
        ))
        .await?;
    console.say(&"-".repeat(65)).await?;
    for line in &detail.lines {
        console
            .say(&format!(
                "{:<30} {:>8} {:>10.2} {:>12.2}",
                line.product_name, line.quantity, line.unit_price, line.line_total
            ))
            .await?;
    }

    console.say("\n--- Payments / Refunds ---").await?;
    if detail.payments.is_empty() {
        console.say("No payment records.").await?;
    } else {
        for p in &detail.payments {
            console
                .say(&format!("{:<8} {:>10.2} at {}", p.method, p.amount, p.paid_at))
                .await?;
        }
    }
    Ok(())
}

async fn view_revenue_and_net_profit<R, W>(
    console: &mut Console<R, W>,
    db: &Database,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let revenue = db.revenue_by_country().await?;

    console.say("\n=== Revenue by Country ===").await?;
    console
        .say(&format!("{:<20} {:>12}", "Country", "Revenue"))
        .await?;
    console.say(&"-".repeat(35)).await?;
    for row in &revenue {
        console
            .say(&format!("{:<20} {:>12.2}", row.country, row.revenue))
            .await?;
    }

    let net_profit = db.net_profit().await?;
    console.say("\n=== Total Net Profit ===").await?;
    console
        .say(&format!("Net profit: {net_profit:.2}"))
        .await?;
    Ok(())
}

async fn view_best_sellers<R, W>(
    console: &mut Console<R, W>,
    db: &Database,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let rows = db.best_selling_products().await?;

    console.say("\n=== Best-selling Products ===").await?;
    console
        .say(&format!(
            "{:<10} {:<30} {:>8} {:>12}",
            "SKU", "Name", "Units", "Sales"
        ))
        .await?;
    console.say(&"-".repeat(65)).await?;
    for row in &rows {
        console
            .say(&format!(
                "{:<10} {:<30} {:>8} {:>12.2}",
                row.sku, row.name, row.units, row.sales
            ))
            .await?;
    }
    Ok(())
}
