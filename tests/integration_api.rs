//! API Integration Tests
//!
//! Drive the router over in-process HTTP against the memory-backed
//! environment.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    middleware, Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use rfi_concierge::api::{self, AppState};

mod common;

use common::TestEnv;

fn app(env: &TestEnv) -> Router {
    let state = AppState {
        store: env.store.clone(),
        directory: env.directory.clone(),
        dispatcher: env.dispatcher.clone(),
        ops_mailbox: env.ops_mailbox.clone(),
    };

    api::create_router()
        .layer(middleware::from_fn(api::middleware::context_middleware))
        .with_state(state)
}

fn rfi_body(buyer: Uuid, staff: Uuid) -> Value {
    json!({
        "rfi_number": "RFI-2099-001",
        "title": "Network modernization",
        "entity": "Ministry of Infrastructure",
        "description": "Seeking vendor input",
        "categories": ["network_infrastructure"],
        "closing_date": "2099-06-01",
        "closing_time": "17:00",
        "grace_period_days": 2,
        "buyer_contact": buyer,
        "program_staff_contact": staff,
    })
}

fn post(uri: &str, user: Option<Uuid>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header("X-Request-User-Id", user.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_publish_and_read() {
    let env = TestEnv::new();
    let buyer = env.seed_buyer();
    let staff = env.seed_staff();
    let app = app(&env);

    // Create
    let response = app
        .clone()
        .oneshot(post("/rfis", Some(buyer), &rfi_body(buyer, staff)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "unpublished");
    let rfi_id = body["rfi_id"].as_str().unwrap().to_string();

    // Publish
    let response = app
        .clone()
        .oneshot(post(
            &format!("/rfis/{}/publish", rfi_id),
            Some(buyer),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Publishing again conflicts and appends nothing.
    let response = app
        .clone()
        .oneshot(post(
            &format!("/rfis/{}/publish", rfi_id),
            Some(buyer),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Read back the detail projection.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/rfis/{}", rfi_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "open");
    assert_eq!(body["version_count"], 1);
    assert_eq!(body["categories"][0], "network_infrastructure");

    // List shows one summary.
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/rfis").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["rfis"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_requires_acting_user() {
    let env = TestEnv::new();
    let buyer = env.seed_buyer();
    let staff = env.seed_staff();
    let app = app(&env);

    let response = app
        .clone()
        .oneshot(post("/rfis", None, &rfi_body(buyer, staff)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error_code"], "missing_header");
}

#[tokio::test]
async fn test_malformed_user_header_rejected() {
    let env = TestEnv::new();
    let buyer = env.seed_buyer();
    let staff = env.seed_staff();
    let app = app(&env);

    let request = Request::builder()
        .method("POST")
        .uri("/rfis")
        .header("content-type", "application/json")
        .header("X-Request-User-Id", "not-a-uuid")
        .body(Body::from(rfi_body(buyer, staff).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error_code"], "invalid_user_id");
}

#[tokio::test]
async fn test_validation_errors_list_fields() {
    let env = TestEnv::new();
    let buyer = env.seed_buyer();
    let staff = env.seed_staff();
    let app = app(&env);

    let mut body = rfi_body(buyer, staff);
    body["title"] = json!("  ");
    body["categories"] = json!(["basket_weaving"]);

    let response = app.clone().oneshot(post("/rfis", Some(buyer), &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error_code"], "validation_failed");
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"categories"));
}

#[tokio::test]
async fn test_unknown_rfi_is_404() {
    let env = TestEnv::new();
    let app = app(&env);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/rfis/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
