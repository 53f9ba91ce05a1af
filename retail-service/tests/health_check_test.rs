//! Database health probe test.

mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_succeeds_on_live_database() {
    let app = TestApp::spawn().await;

    app.db
        .health_check()
        .await
        .expect("Health check against a live database must pass");

    app.cleanup().await;
}
