//! HTTP service tests driven through the router without binding a socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use hash_match::catalog::store::HashStore;
use hash_match::core::hash::HashConfig;
use hash_match::web::server::{create_router, AppState};

fn app() -> Router {
    let config = HashConfig::default().with_hash_len(4).with_threshold(1000);
    let references = HashStore::from_text(
        "ref0,0,0,0,0\nref1,10,10,10,10\nref2,100,100,100,100\nbroken,1\n",
        &config,
    )
    .unwrap();
    create_router(Arc::new(AppState { references, config }))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_match(body: &str) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::post("/api/match")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_store_info() {
    let response = app()
        .oneshot(Request::get("/api/store").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["record_count"], 3);
    assert_eq!(json["skipped_lines"], 1);
    assert_eq!(json["hash_len"], 4);
    assert_eq!(json["threshold"], 1000);
}

#[tokio::test]
async fn test_first_match() {
    let (status, json) = post_match(r#"{"name": "upload", "hash": [7, 7, 7, 7]}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "upload");
    assert_eq!(json["mode"], "first");
    assert_eq!(json["threshold"], 1000);
    assert_eq!(json["outcome"], "matched");
    assert_eq!(json["index"], 0);
    assert_eq!(json["distance"], 196);
    assert_eq!(json["reference"], "ref0");
}

#[tokio::test]
async fn test_best_match_with_text_hash() {
    let (status, json) = post_match(r#"{"hash": "7,7,7,7", "mode": "best"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "matched");
    assert_eq!(json["index"], 1);
    assert_eq!(json["distance"], 36);
    assert_eq!(json["reference"], "ref1");
}

#[tokio::test]
async fn test_no_match_and_threshold_override() {
    let (status, json) = post_match(r#"{"hash": [200, 200, 200, 200]}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "no_match");
    assert!(json.get("reference").is_none());

    let (_, json) =
        post_match(r#"{"hash": [200, 200, 200, 200], "mode": "best", "threshold": 40000}"#).await;
    assert_eq!(json["outcome"], "matched");
    assert_eq!(json["index"], 2);
    assert_eq!(json["distance"], 40000);

    let (_, json) = post_match(r#"{"hash": [0, 0, 0, 0], "threshold": -1}"#).await;
    assert_eq!(json["outcome"], "no_match");
    assert_eq!(json["threshold"], -1);
}

#[tokio::test]
async fn test_score_mode() {
    let (status, json) = post_match(r#"{"hash": [200, 200, 200, 200], "mode": "score"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "scored");
    assert_eq!(json["closest"]["index"], 2);
    assert_eq!(json["closest"]["distance"], 40000);
    assert_eq!(json["reference"], "ref2");
    assert!(json.get("threshold").is_none());
}

#[tokio::test]
async fn test_rejects_wrong_length_hash() {
    let (status, json) = post_match(r#"{"hash": [1, 2]}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "invalid_hash");
}

#[tokio::test]
async fn test_rejects_malformed_body() {
    let (status, json) = post_match(r#"{"name": "missing hash"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "invalid_request");

    let (status, _) = post_match("not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
