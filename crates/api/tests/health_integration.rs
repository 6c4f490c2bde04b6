//! HTTP tests for health probes and request tracing.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{get_request, TestApp};
use tower::ServiceExt;

#[tokio::test]
async fn test_liveness_does_not_touch_database() {
    let app = TestApp::new();

    let (status, body) = app.send(get_request("/api/health/live")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_readiness_reports_unreachable_database() {
    let app = TestApp::new();

    let (status, _) = app.send(get_request("/api/health/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = app.send(get_request("/api/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/health/live")
        .header("x-request-id", "probe-42")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "probe-42"
    );
}

#[tokio::test]
async fn test_request_id_is_generated_when_missing() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/v1/devices"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();

    let (status, _) = app.send(get_request("/api/v1/gadgets")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
