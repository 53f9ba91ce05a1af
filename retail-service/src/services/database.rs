//! Database service for retail-service.
//!
//! All SQL lives here. Every operation is a self-contained read or
//! read-modify-write unit returning a typed result; the write operations
//! (order placement, refund) run inside one explicit transaction each.

use crate::models::{
    AcceptedLine, BestSeller, CountryRevenue, Customer, InvoiceDetail, InvoiceHeader,
    InvoiceLineDetail, InvoiceSummary, InvoiceTotals, PaymentRecord, PlaceOrderRequest,
    PlacedOrder, Product, RefundReceipt, RefundRequest, RejectedLine, RejectionReason,
};
use retail_core::error::AppError;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Database connection handle.
///
/// The pool is capped at a single connection: operations never overlap and
/// the process holds exactly one connection for its lifetime, reused across
/// all operations.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL. Failure here is fatal to startup.
    #[instrument(skip(database_url), fields(service = "retail-service"))]
    pub async fn new(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection established");

        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by the test harness).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Catalog and Customer Queries
    // -------------------------------------------------------------------------

    /// List active products, ordered by id.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, sku, name, unit_price, is_active
            FROM product
            WHERE is_active = TRUE
            ORDER BY product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list products: {}", e)))?;

        Ok(products)
    }

    /// Short customer pick-list (id + name), ordered by id.
    #[instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT customer_id, full_name
            FROM customer
            ORDER BY customer_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list customers: {}", e)))?;

        Ok(customers)
    }

    // -------------------------------------------------------------------------
    // Order Placement
    // -------------------------------------------------------------------------

    /// Place an order and pay for it in one transaction.
    ///
    /// Inserts the invoice first (deriving ship-to-country from the
    /// customer's country), then one invoice_line per accepted request line
    /// at the product's current price, then a single payment for the
    /// subtotal. Lines with a non-positive quantity or an inactive/unknown
    /// product are skipped, never fatal. An order whose every line was
    /// skipped deletes the provisional invoice and commits that deletion as
    /// a clean no-op. Any error rolls the whole sequence back.
    #[instrument(skip(self, req), fields(customer_id = req.customer_id))]
    pub async fn place_order(
        &self,
        req: &PlaceOrderRequest,
        currency: &str,
    ) -> Result<PlacedOrder, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to begin: {}", e)))?;

        // Invoice row, pay-on-create model: status is PAID from the start.
        // The INSERT..SELECT resolves the customer and their country in one
        // statement; zero rows means the customer id does not exist.
        let invoice_id: Option<i32> = sqlx::query_scalar(
            r#"
            INSERT INTO invoice (customer_id, invoice_date, status, currency, ship_to_country)
            SELECT cu.customer_id, NOW(), 'PAID', $2, c.name
            FROM customer cu
            JOIN country c ON c.country_id = cu.country_id
            WHERE cu.customer_id = $1
            RETURNING invoice_id
            "#,
        )
        .bind(req.customer_id)
        .bind(currency)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create invoice: {}", e)))?;

        let Some(invoice_id) = invoice_id else {
            tx.rollback()
                .await
                .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to rollback: {}", e)))?;
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Customer {} not found",
                req.customer_id
            )));
        };

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        let mut subtotal = Decimal::ZERO;

        for line in &req.lines {
            if line.quantity <= 0 {
                rejected.push(RejectedLine {
                    line: *line,
                    reason: RejectionReason::BadQuantity,
                });
                continue;
            }

            // Price frozen at order time, decoupled from later catalog edits.
            let unit_price: Option<Decimal> = sqlx::query_scalar(
                r#"
                SELECT unit_price
                FROM product
                WHERE product_id = $1 AND is_active = TRUE
                "#,
            )
            .bind(line.product_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to look up product: {}", e))
            })?;

            let Some(unit_price) = unit_price else {
                rejected.push(RejectedLine {
                    line: *line,
                    reason: RejectionReason::ProductNotActive,
                });
                continue;
            };

            // line_total is a generated column; the database maintains it.
            sqlx::query(
                r#"
                INSERT INTO invoice_line (invoice_id, product_id, quantity, unit_price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(invoice_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(unit_price)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert line: {}", e))
            })?;

            let line_total = unit_price * Decimal::from(line.quantity);
            subtotal += line_total;
            accepted.push(AcceptedLine {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price,
                line_total,
            });
        }

        if accepted.is_empty() {
            // An invoice with zero lines is invalid; delete it rather than
            // persist it, and commit the deletion as a clean no-op.
            sqlx::query("DELETE FROM invoice WHERE invoice_id = $1")
                .bind(invoice_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to cancel invoice: {}", e))
                })?;
            tx.commit()
                .await
                .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to commit: {}", e)))?;

            info!(invoice_id = invoice_id, "Order had no accepted lines, invoice cancelled");

            return Ok(PlacedOrder::Empty { rejected });
        }

        sqlx::query(
            r#"
            INSERT INTO payment (invoice_id, method, amount, paid_at)
            VALUES ($1, $2, $3, NOW())
            "#,
        )
        .bind(invoice_id)
        .bind(&req.payment_method)
        .bind(subtotal)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to insert payment: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to commit: {}", e)))?;

        info!(
            invoice_id = invoice_id,
            subtotal = %subtotal,
            method = %req.payment_method,
            lines = accepted.len(),
            skipped = rejected.len(),
            "Order placed and paid"
        );

        Ok(PlacedOrder::Paid {
            invoice_id,
            accepted,
            rejected,
            subtotal,
            payment_method: req.payment_method.clone(),
        })
    }

    // -------------------------------------------------------------------------
    // Refunds
    // -------------------------------------------------------------------------

    /// Billed and net-paid aggregates for one invoice, zero when no rows.
    #[instrument(skip(self), fields(invoice_id = invoice_id))]
    pub async fn invoice_totals(&self, invoice_id: i32) -> Result<InvoiceTotals, AppError> {
        let billed: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(line_total), 0)
            FROM invoice_line
            WHERE invoice_id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum lines: {}", e)))?;

        let paid: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM payment
            WHERE invoice_id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum payments: {}", e)))?;

        Ok(InvoiceTotals { billed, paid })
    }

    /// Record a refund as a new negative payment row.
    ///
    /// Existing payment rows are never mutated. A refund larger than the
    /// net paid so far is flagged, not blocked.
    #[instrument(skip(self, req), fields(invoice_id = req.invoice_id))]
    pub async fn record_refund(&self, req: &RefundRequest) -> Result<RefundReceipt, AppError> {
        if req.amount <= Decimal::ZERO {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Refund amount must be a positive number"
            )));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to begin: {}", e)))?;

        let exists: Option<i32> = sqlx::query_scalar(
            "SELECT invoice_id FROM invoice WHERE invoice_id = $1",
        )
        .bind(req.invoice_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to look up invoice: {}", e)))?;

        if exists.is_none() {
            tx.rollback()
                .await
                .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to rollback: {}", e)))?;
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Invoice {} not found",
                req.invoice_id
            )));
        }

        let billed: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(line_total), 0)
            FROM invoice_line
            WHERE invoice_id = $1
            "#,
        )
        .bind(req.invoice_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum lines: {}", e)))?;

        let paid: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM payment
            WHERE invoice_id = $1
            "#,
        )
        .bind(req.invoice_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum payments: {}", e)))?;

        let over_refund = req.amount > paid;
        if over_refund {
            warn!(
                invoice_id = req.invoice_id,
                amount = %req.amount,
                paid = %paid,
                "Refund exceeds total payments, proceeding anyway"
            );
        }

        sqlx::query(
            r#"
            INSERT INTO payment (invoice_id, method, amount, paid_at, external_ref)
            VALUES ($1, 'REFUND', $2, NOW(), NULL)
            "#,
        )
        .bind(req.invoice_id)
        .bind(-req.amount)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to insert refund: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to commit: {}", e)))?;

        info!(invoice_id = req.invoice_id, amount = %req.amount, "Refund recorded");

        Ok(RefundReceipt {
            invoice_id: req.invoice_id,
            amount: req.amount,
            billed,
            paid_before: paid,
            over_refund,
        })
    }

    // -------------------------------------------------------------------------
    // Invoice Inspection
    // -------------------------------------------------------------------------

    /// List every invoice with a derived has-refund flag.
    #[instrument(skip(self))]
    pub async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, AppError> {
        let invoices = sqlx::query_as::<_, InvoiceSummary>(
            r#"
            SELECT i.invoice_id,
                   cu.full_name AS customer_name,
                   EXISTS (
                       SELECT 1
                       FROM payment p
                       WHERE p.invoice_id = i.invoice_id
                         AND p.amount < 0
                   ) AS has_refund
            FROM invoice i
            JOIN customer cu ON cu.customer_id = i.customer_id
            ORDER BY i.invoice_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e)))?;

        Ok(invoices)
    }

    /// Full detail for one invoice: header, line items, payment history.
    ///
    /// Returns `Ok(None)` for an unknown id without issuing the follow-up
    /// queries.
    #[instrument(skip(self), fields(invoice_id = invoice_id))]
    pub async fn invoice_detail(&self, invoice_id: i32) -> Result<Option<InvoiceDetail>, AppError> {
        let header = sqlx::query_as::<_, InvoiceHeader>(
            r#"
            SELECT i.invoice_id,
                   cu.full_name AS customer_name,
                   i.invoice_date,
                   i.status,
                   i.ship_to_country
            FROM invoice i
            JOIN customer cu ON cu.customer_id = i.customer_id
            WHERE i.invoice_id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice: {}", e)))?;

        let Some(header) = header else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, InvoiceLineDetail>(
            r#"
            SELECT p.name AS product_name,
                   il.quantity,
                   il.unit_price,
                   il.line_total
            FROM invoice_line il
            JOIN product p ON p.product_id = il.product_id
            WHERE il.invoice_id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get lines: {}", e)))?;

        let payments = sqlx::query_as::<_, PaymentRecord>(
            r#"
            SELECT method, amount, paid_at
            FROM payment
            WHERE invoice_id = $1
            ORDER BY paid_at
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get payments: {}", e)))?;

        Ok(Some(InvoiceDetail {
            header,
            lines,
            payments,
        }))
    }

    // -------------------------------------------------------------------------
    // Reporting
    // -------------------------------------------------------------------------

    /// Best-selling products by total units sold, descending.
    ///
    /// Ties on equal unit counts are left to the store's default ordering.
    #[instrument(skip(self))]
    pub async fn best_selling_products(&self) -> Result<Vec<BestSeller>, AppError> {
        let rows = sqlx::query_as::<_, BestSeller>(
            r#"
            SELECT p.sku, p.name,
                   SUM(il.quantity) AS units,
                   SUM(il.line_total) AS sales
            FROM product p
            JOIN invoice_line il ON il.product_id = p.product_id
            GROUP BY p.sku, p.name
            ORDER BY units DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to rank products: {}", e)))?;

        Ok(rows)
    }

    /// Gross revenue grouped by customer country, descending.
    #[instrument(skip(self))]
    pub async fn revenue_by_country(&self) -> Result<Vec<CountryRevenue>, AppError> {
        let rows = sqlx::query_as::<_, CountryRevenue>(
            r#"
            SELECT c.name AS country,
                   SUM(il.line_total) AS revenue
            FROM invoice i
            JOIN customer cu ON cu.customer_id = i.customer_id
            JOIN country c ON c.country_id = cu.country_id
            JOIN invoice_line il ON il.invoice_id = i.invoice_id
            GROUP BY c.name
            ORDER BY revenue DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to compute revenue: {}", e))
        })?;

        Ok(rows)
    }

    /// Net profit: the sum of every payment amount in the system.
    /// Refunds are negative rows, so they reduce this figure.
    #[instrument(skip(self))]
    pub async fn net_profit(&self) -> Result<Decimal, AppError> {
        let total: Decimal = sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0) FROM payment")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to compute net profit: {}", e))
            })?;

        Ok(total)
    }
}
