mod common;

use axum::http::StatusCode;
use axum_test::TestServer;

/// Full lifecycle: create, redirect twice, counter reaches 2, analytics
/// reflects the clicks once the worker drains the queue.
#[tokio::test]
async fn test_create_redirect_and_count() {
    let app = common::test_app();
    app.seed_key("e2e-key", "user-1").await;
    let links = app.links.clone();
    let (state, clicks) = app.spawn_click_worker();
    let server = TestServer::new(common::router_for(state)).unwrap();

    // Create.
    let created = server
        .post("/urls")
        .add_header("x-api-key", "e2e-key")
        .json(&serde_json::json!({ "long_url": "https://a.com" }))
        .await;
    created.assert_status_ok();
    let body: serde_json::Value = created.json();
    let code = body["short_code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));

    // First redirect.
    let first = server
        .get(&format!("/{code}"))
        .add_header("User-Agent", "Mozilla/5.0 (iPhone)")
        .await;
    first.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(first.header("location"), "https://a.com");

    // Second redirect bumps the counter to 2.
    let second = server.get(&format!("/{code}")).await;
    second.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(links.get(&code).unwrap().usage_count, 2);

    // Both clicks eventually land in the ledger.
    for _ in 0..50 {
        if clicks.all().len() == 2 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(clicks.all().len(), 2);

    // Analytics over the ledger sees them, grouped.
    let analytics = server
        .get("/urls/analytics")
        .add_query_param("short_code", &code)
        .add_header("x-api-key", "e2e-key")
        .await;
    analytics.assert_status_ok();
    let analytics_body: serde_json::Value = analytics.json();
    assert_eq!(analytics_body["analytics"]["total_clicks_analyzed"], 2);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = common::test_app();
    let server = TestServer::new(app.router()).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["click_queue"]["status"], "ok");
}

#[tokio::test]
async fn test_responses_carry_cors_headers() {
    let app = common::test_app();
    let server = TestServer::new(app.router()).unwrap();

    let response = server.get("/health").add_header("Origin", "https://app.example").await;

    assert_eq!(response.header("access-control-allow-origin"), "*");
}

#[tokio::test]
async fn test_landing_page() {
    let app = common::test_app();
    let server = TestServer::new(app.router()).unwrap();

    let response = server.get("/").await;

    response.assert_status_ok();
    assert!(response.text().contains("linkcut"));
}
