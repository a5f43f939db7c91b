use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use ledgersync_connect::ProviderClientConfig;
use ledgersync_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn build_test_router() -> (axum::Router, TempDir) {
    let tmp = tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        request_timeout: Duration::from_secs(10),
        sync_workers: 2,
        sync_interval: Duration::from_secs(3600),
        provider: ProviderClientConfig::new("http://127.0.0.1:9", "client-id", "secret"),
        log_format: "text".to_string(),
    };
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config), tmp)
}

async fn send(app: &axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create_family(app: &axum::Router) -> String {
    let (status, family) = send(
        app,
        Method::POST,
        "/api/v1/families",
        Some(json!({ "name": "Household", "currency": "USD" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    family["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn healthz_responds() {
    let (app, _tmp) = build_test_router().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn family_sync_is_queued() {
    let (app, _tmp) = build_test_router().await;
    let family_id = create_family(&app).await;

    let (status, record) = send(
        &app,
        Method::POST,
        &format!("/api/v1/families/{}/sync", family_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(record["target"]["kind"], "family");
    assert_eq!(record["target"]["id"], family_id.as_str());

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/families/{}/sync-status", family_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["familyId"], family_id.as_str());
    assert!(body["syncing"].is_boolean());
}

#[tokio::test]
async fn unknown_family_is_not_found() {
    let (app, _tmp) = build_test_router().await;
    let (status, body) = send(&app, Method::POST, "/api/v1/families/missing/sync", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn blank_family_name_is_rejected() {
    let (app, _tmp) = build_test_router().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/families",
        Some(json!({ "name": " ", "currency": "USD" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_is_acknowledged_even_when_unsigned() {
    let (app, _tmp) = build_test_router().await;
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/webhooks/plaid")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"webhook_type":"TRANSACTIONS","webhook_code":"SYNC_UPDATES_AVAILABLE","item_id":"x"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn transfer_review_of_unknown_link_is_not_found() {
    let (app, _tmp) = build_test_router().await;
    let (status, _) = send(&app, Method::POST, "/api/v1/transfers/nope/reject", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, "/api/v1/transfers/nope/confirm", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn linking_requires_a_public_token() {
    let (app, _tmp) = build_test_router().await;
    let family_id = create_family(&app).await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/items",
        Some(json!({ "familyId": family_id, "publicToken": "", "name": "Bank" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn linking_with_unreachable_provider_is_bad_gateway() {
    let (app, _tmp) = build_test_router().await;
    let family_id = create_family(&app).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/items",
        Some(json!({ "familyId": family_id, "publicToken": "public-sandbox-1", "name": "Bank" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], 502);
}
