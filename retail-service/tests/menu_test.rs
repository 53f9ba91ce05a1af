//! End-to-end console sessions over scripted input.

mod common;

use common::{dec, seed_country, seed_customer, seed_product, TestApp};
use retail_service::config::{Config, DatabaseConfig};
use retail_service::console::{self, Console};
use secrecy::Secret;

fn test_config() -> Config {
    Config {
        database: DatabaseConfig {
            url: Secret::new("unused-in-tests".to_string()),
        },
        currency: "GBP".to_string(),
        log_level: "info".to_string(),
        service_name: "retail-service-test".to_string(),
    }
}

/// Run a scripted session and return everything printed.
async fn run_session(app: &TestApp, script: String) -> String {
    let config = test_config();
    let mut out: Vec<u8> = Vec::new();
    {
        let mut console = Console::new(script.as_bytes(), std::io::Cursor::new(&mut out));
        console::run(&mut console, &app.db, &config)
            .await
            .expect("Console session failed");
    }
    String::from_utf8(out).expect("Console output is UTF-8")
}

#[tokio::test]
async fn browse_then_exit_lists_active_products() {
    let app = TestApp::spawn().await;
    seed_product(&app.db, "TEA-01", "Earl Grey", "4.50", true).await;
    seed_product(&app.db, "OLD-01", "Retired Blend", "2.00", false).await;

    let output = run_session(&app, "1\n1\n0\n0\n".to_string()).await;

    assert!(output.contains("=== Product List ==="));
    assert!(output.contains("Earl Grey"));
    assert!(!output.contains("Retired Blend"));
    assert!(output.contains("Bye!"));
}

#[tokio::test]
async fn scripted_order_flow_places_and_pays() {
    let app = TestApp::spawn().await;
    let country = seed_country(&app.db, "United Kingdom").await;
    let customer = seed_customer(&app.db, "Ada Lovelace", country).await;
    let product = seed_product(&app.db, "MUG-01", "Stoneware Mug", "12.00", true).await;

    // Customer menu -> place order -> customer id -> one line -> blank to
    // finish -> blank payment method (defaults to CARD) -> back -> exit.
    let script = format!("1\n2\n{customer}\n{product}\n2\n\n\n0\n0\n");
    let output = run_session(&app, script).await;

    assert!(output.contains("Order placed and paid successfully"));
    assert!(output.contains("method CARD"));

    let totals = app.db.invoice_totals(1).await.expect("totals");
    assert_eq!(totals.billed, dec("24.00"));
    assert_eq!(totals.paid, dec("24.00"));
}

#[tokio::test]
async fn invalid_menu_choice_reprompts() {
    let app = TestApp::spawn().await;

    let output = run_session(&app, "9\n0\n".to_string()).await;
    assert!(output.contains("Invalid choice, please try again."));
    assert!(output.contains("Bye!"));
}

#[tokio::test]
async fn scripted_refund_flow_warns_on_over_refund() {
    let app = TestApp::spawn().await;
    let country = seed_country(&app.db, "France").await;
    let customer = seed_customer(&app.db, "Blaise Pascal", country).await;
    let product = seed_product(&app.db, "PEN-01", "Quill Pen", "30.00", true).await;

    // Place the order first, then refund more than was paid.
    let order_script = format!("1\n2\n{customer}\n{product}\n1\n\n\n0\n0\n");
    run_session(&app, order_script).await;

    let refund_script = "1\n3\n1\n50.00\n0\n0\n".to_string();
    let output = run_session(&app, refund_script).await;

    assert!(output.contains("billed = 30.00, paid so far = 30.00"));
    assert!(output.contains("Warning: refund is greater than total payments"));
    assert!(output.contains("Refund of 50.00 recorded for invoice #1."));

    let totals = app.db.invoice_totals(1).await.expect("totals");
    assert_eq!(totals.paid, dec("-20.00"));
}

#[tokio::test]
async fn admin_reports_render_over_scripted_session() {
    let app = TestApp::spawn().await;
    let country = seed_country(&app.db, "Japan").await;
    let customer = seed_customer(&app.db, "Sei Shonagon", country).await;
    let product = seed_product(&app.db, "INK-01", "Ink Stone", "20.00", true).await;

    let order_script = format!("1\n2\n{customer}\n{product}\n2\n\n\n0\n0\n");
    run_session(&app, order_script).await;

    // Admin menu: invoices (blank to return), revenue + net profit, best
    // sellers, back, exit.
    let admin_script = "2\n1\n\n2\n3\n0\n0\n".to_string();
    let output = run_session(&app, admin_script).await;

    assert!(output.contains("=== All Invoices ==="));
    assert!(output.contains("Sei Shonagon"));
    assert!(output.contains("=== Revenue by Country ==="));
    assert!(output.contains("Japan"));
    assert!(output.contains("Net profit: 40.00"));
    assert!(output.contains("=== Best-selling Products ==="));
    assert!(output.contains("INK-01"));
}
