//! Reporting integration tests: best sellers, revenue, net profit.

mod common;

use common::{dec, seed_country, seed_customer, seed_product, TestApp, TEST_CURRENCY};
use retail_service::models::{OrderLineRequest, PlaceOrderRequest, PlacedOrder, RefundRequest};

async fn place(app: &TestApp, customer: i32, lines: Vec<OrderLineRequest>) -> i32 {
    let outcome = app
        .db
        .place_order(
            &PlaceOrderRequest {
                customer_id: customer,
                lines,
                payment_method: "CARD".to_string(),
            },
            TEST_CURRENCY,
        )
        .await
        .expect("Failed to place order");
    match outcome {
        PlacedOrder::Paid { invoice_id, .. } => invoice_id,
        PlacedOrder::Empty { .. } => panic!("Expected a paid order"),
    }
}

#[tokio::test]
async fn best_sellers_rank_by_units_across_invoices() {
    let app = TestApp::spawn().await;
    let country = seed_country(&app.db, "Sweden").await;
    let customer = seed_customer(&app.db, "Astrid Lindgren", country).await;
    let candle = seed_product(&app.db, "CAN-01", "Beeswax Candle", "6.00", true).await;
    let lamp = seed_product(&app.db, "LMP-01", "Desk Lamp", "40.00", true).await;

    // Candles: 3 + 2 = 5 units over two invoices; lamps: 2 units.
    place(&app, customer, vec![OrderLineRequest { product_id: candle, quantity: 3 }]).await;
    place(
        &app,
        customer,
        vec![
            OrderLineRequest { product_id: candle, quantity: 2 },
            OrderLineRequest { product_id: lamp, quantity: 2 },
        ],
    )
    .await;

    let ranking = app.db.best_selling_products().await.expect("ranking");
    assert_eq!(ranking.len(), 2);
    assert_eq!(ranking[0].sku, "CAN-01");
    assert_eq!(ranking[0].units, 5);
    assert_eq!(ranking[0].sales, dec("30.00"));
    assert_eq!(ranking[1].sku, "LMP-01");
    assert_eq!(ranking[1].units, 2);
    assert_eq!(ranking[1].sales, dec("80.00"));
}

#[tokio::test]
async fn revenue_groups_by_customer_country_descending() {
    let app = TestApp::spawn().await;
    let uk = seed_country(&app.db, "United Kingdom").await;
    let nz = seed_country(&app.db, "New Zealand").await;
    let alice = seed_customer(&app.db, "Alice Hargreaves", uk).await;
    let kate = seed_customer(&app.db, "Kate Sheppard", nz).await;
    let kettle = seed_product(&app.db, "KET-01", "Copper Kettle", "50.00", true).await;

    place(&app, alice, vec![OrderLineRequest { product_id: kettle, quantity: 1 }]).await;
    place(&app, kate, vec![OrderLineRequest { product_id: kettle, quantity: 3 }]).await;

    let revenue = app.db.revenue_by_country().await.expect("revenue");
    assert_eq!(revenue.len(), 2);
    assert_eq!(revenue[0].country, "New Zealand");
    assert_eq!(revenue[0].revenue, dec("150.00"));
    assert_eq!(revenue[1].country, "United Kingdom");
    assert_eq!(revenue[1].revenue, dec("50.00"));
}

#[tokio::test]
async fn net_profit_sums_all_payments_including_refunds() {
    let app = TestApp::spawn().await;
    let country = seed_country(&app.db, "Denmark").await;
    let customer = seed_customer(&app.db, "Karen Blixen", country).await;
    let chair = seed_product(&app.db, "CHR-01", "Oak Chair", "25.00", true).await;
    let table = seed_product(&app.db, "TBL-01", "Oak Table", "40.00", true).await;

    let first = place(&app, customer, vec![OrderLineRequest { product_id: chair, quantity: 1 }]).await;
    place(&app, customer, vec![OrderLineRequest { product_id: table, quantity: 1 }]).await;
    app.db
        .record_refund(&RefundRequest { invoice_id: first, amount: dec("10.00") })
        .await
        .expect("Failed to refund");

    // 25.00 + 40.00 - 10.00
    let net = app.db.net_profit().await.expect("net profit");
    assert_eq!(net, dec("55.00"));
}

#[tokio::test]
async fn reports_are_empty_on_a_fresh_database() {
    let app = TestApp::spawn().await;

    assert!(app.db.best_selling_products().await.expect("ranking").is_empty());
    assert!(app.db.revenue_by_country().await.expect("revenue").is_empty());
    assert_eq!(app.db.net_profit().await.expect("net profit"), dec("0"));
}
