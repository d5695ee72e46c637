//! HTTP routing and handler integration tests
//!
//! Drives the router with `tower::ServiceExt::oneshot`; no socket is bound.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use helpers::{test_state, test_state_with, StubLookup};
use persona_api::build_router;

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create(app: &Router, name: &str, surname: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/persons",
        Some(json!({ "name": name, "surname": surname })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_router(test_state().await);

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "persona-api");
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_heartbeat_is_no_content() {
    let app = build_router(test_state().await);

    let (status, body) = send(&app, "GET", "/api/heartbeat", None).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_create_returns_enriched_person() {
    let app = build_router(test_state().await);

    let (status, body) = send(
        &app,
        "POST",
        "/api/persons",
        Some(json!({ "name": "Dmitriy", "surname": "Ushakov", "patronymic": "Vasilevich" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Dmitriy");
    assert_eq!(body["patronymic"], "Vasilevich");
    assert_eq!(body["age"], 42);
    assert_eq!(body["gender"], "male");
    assert_eq!(body["nationality"], "UA");
}

#[tokio::test]
async fn test_create_rejects_blank_name() {
    let app = build_router(test_state().await);

    let (status, body) = send(
        &app,
        "POST",
        "/api/persons",
        Some(json!({ "name": "  ", "surname": "Ushakov" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_rejects_malformed_body() {
    let app = build_router(test_state().await);

    let (status, _) = send(&app, "POST", "/api/persons", Some(json!({ "surname": "X" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_reports_enrichment_failure_as_internal() {
    let app = build_router(test_state_with(StubLookup::failing()).await);

    let (status, body) = send(
        &app,
        "POST",
        "/api/persons",
        Some(json!({ "name": "Dmitriy", "surname": "Ushakov" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");

    let (_, count) = send(&app, "GET", "/api/persons/count", None).await;
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_get_update_delete_cycle() {
    let app = build_router(test_state().await);
    let id = create(&app, "Anna", "Petrova").await;
    let uri = format!("/api/persons/{}", id);

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["surname"], "Petrova");

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({
            "name": "Anna",
            "surname": "Sidorova",
            "age": 31,
            "gender": "female",
            "nationality": "RU"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["surname"], "Sidorova");
    assert_eq!(body["age"], 31);
    assert_eq!(body["nationality"], "RU");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let app = build_router(test_state().await);

    let (status, _) = send(&app, "DELETE", "/api/persons/41", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let app = build_router(test_state().await);

    let (status, _) = send(&app, "GET", "/api/persons/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_with_paging_and_sort() {
    let app = build_router(test_state().await);
    for name in ["Ann", "Bob", "Cid", "Dee", "Eve"] {
        create(&app, name, "Tester").await;
    }

    let (status, body) = send(
        &app,
        "GET",
        "/api/persons?sort_by=name&sort_order=desc&page=1&per_page=2",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 2);
    let names: Vec<&str> = body["persons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Cid", "Bob"]);
}

#[tokio::test]
async fn test_list_by_id_returns_single_person() {
    let app = build_router(test_state().await);
    create(&app, "Ann", "Tester").await;
    let id = create(&app, "Bob", "Tester").await;

    let (status, body) = send(&app, "GET", &format!("/api/persons?id={}", id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["persons"].as_array().unwrap().len(), 1);
    assert_eq!(body["persons"][0]["name"], "Bob");
}

#[tokio::test]
async fn test_list_rejects_unknown_sort_order() {
    let app = build_router(test_state().await);

    let (status, body) = send(&app, "GET", "/api/persons?sort_order=sideways", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_count_endpoint() {
    let app = build_router(test_state().await);
    create(&app, "Ann", "Tester").await;
    create(&app, "Bob", "Tester").await;

    let (status, body) = send(&app, "GET", "/api/persons/count", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
}
