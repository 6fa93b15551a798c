use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_answer_liveness_with_plain_text(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(String::from_utf8_lossy(&response.body_bytes), "OK");
    assert!(response.body.is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_readiness_with_database_status(ctx: &TestContext) {
    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_a_request_id_when_missing(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_header_exists("x-request-id");
    let id = response.header("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok(), "Not a UUID: {}", id);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_echo_a_valid_incoming_request_id(ctx: &TestContext) {
    let response = ctx
        .client
        .get_with_headers("/health/ready", &[("x-request-id", "edge-7f3a.42")])
        .await
        .unwrap();

    assert_eq!(response.header("x-request-id").map(String::as_str), Some("edge-7f3a.42"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_replace_a_malformed_request_id(ctx: &TestContext) {
    let response = ctx
        .client
        .get_with_headers("/health", &[("x-request-id", "bad id with spaces")])
        .await
        .unwrap();

    let id = response.header("x-request-id").unwrap();
    assert_ne!(id, "bad id with spaces");
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_handle_concurrent_health_checks(ctx: &TestContext) {
    let checks = (0..10).map(|_| {
        let client = ctx.client.clone();
        async move { client.get("/health").await }
    });

    for result in futures::future::join_all(checks).await {
        result.unwrap().assert_status(StatusCode::OK);
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_protected_routes_without_a_token(ctx: &TestContext) {
    for path in ["/api/usage", "/api/students/capacity"] {
        let response = ctx.client.get(path).await.unwrap();
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_error_code("UNAUTHORIZED");
        response.assert_header_exists("x-request-id");
    }
}
