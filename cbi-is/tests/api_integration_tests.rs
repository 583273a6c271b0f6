//! Integration tests for the cbi-is API endpoints
//!
//! Drives the full router with tower's oneshot against stub service clients,
//! covering every operator action and the event stream side effects.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use cbi_common::types::RecommendedAction;
use helpers::*;

/// Test helper: create the test app over stub clients
fn create_test_app() -> (axum::Router, cbi_is::AppState) {
    let (clients, _registry) = happy_clients();
    let state = test_state(clients);
    (cbi_is::build_router(state.clone()), state)
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Poll GET /inspection/{id} until the airline lookup has resolved
async fn wait_for_airline_code(app: &axum::Router, session_id: &str) -> Value {
    for _ in 0..100 {
        let response = app
            .clone()
            .oneshot(get(&format!("/inspection/{}", session_id)))
            .await
            .unwrap();
        let body = json_body(response).await;
        if body.get("airline_code").is_some() || body.get("lookup_warning").is_some() {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("airline lookup never resolved");
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _state) = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "cbi-is");
}

#[tokio::test]
async fn test_full_inspection_flow_over_http() {
    let (app, _state) = create_test_app();

    // Start a session
    let response = app
        .clone()
        .oneshot(post_json(
            "/inspection/start",
            json!({ "airline": "Lufthansa" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["step"], "flight");
    let session_id = body["session_id"].as_str().unwrap().to_string();

    // The carrier code resolves in the background
    let resolved = wait_for_airline_code(&app, &session_id).await;
    assert_eq!(resolved["airline_code"], "LH");

    // Flight step
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/inspection/{}/flight", session_id),
            json!({
                "flight_number": "LH1234",
                "service_class": "Business",
                "origin": "FRA",
                "destination": "JFK"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["step"], "scan");
    assert_eq!(body["flight"]["airline_code"], "LH");

    // Scan step: the stub recognizer matches barcode 123
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/inspection/{}/scan", session_id),
            json!({ "image": frame() }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["outcome"], "matched");
    assert_eq!(body["step"], "preview");
    assert_eq!(body["bottle"]["status"], "found");
    assert_eq!(body["bottle"]["barcode"], "123");

    // Preview confirmation
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/inspection/{}/preview/continue", session_id),
            json!({}),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["step"], "qualitative");

    // Qualitative step resolves into done with the rendered recommendation
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/inspection/{}/qualitative", session_id),
            json!({
                "condition": "intact",
                "seal_status": "sealed",
                "fill_level": 90,
                "cleanliness": 9
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["outcome"], "registered");
    assert_eq!(body["step"], "done");
    assert_eq!(body["result"]["registered"], true);
    assert_eq!(body["result"]["recommended_action"], "keep");
    assert_eq!(body["result"]["category"], "affirmative");

    // Restart returns to flight
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/inspection/{}/restart", session_id),
            json!({}),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["step"], "flight");
    assert!(body.get("result").is_none());

    // Exit is refused outside done
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/inspection/{}/exit", session_id),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_unmatched_scan_skips_preview_over_http() {
    let registry = Arc::new(StubRegistry::new(RegistryBehavior::Accept(
        RecommendedAction::Refill,
    )));
    let clients = stub_clients(
        StubAirlines {
            code: Some("EK".to_string()),
        },
        StubRecognizer {
            behavior: RecognizerBehavior::Respond(unmatched_response("456")),
        },
        registry,
    );
    let app = cbi_is::build_router(test_state(clients));

    let body = json_body(
        app.clone()
            .oneshot(post_json(
                "/inspection/start",
                json!({ "airline": "Emirates" }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let session_id = body["session_id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(post_json(
            &format!("/inspection/{}/flight", session_id),
            json!({ "flight_number": "EK43" }),
        ))
        .await
        .unwrap();

    let body = json_body(
        app.clone()
            .oneshot(post_json(
                &format!("/inspection/{}/scan", session_id),
                json!({ "image": frame() }),
            ))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(body["outcome"], "unmatched");
    assert_eq!(body["step"], "qualitative");
    assert_eq!(body["bottle"]["status"], "not_found");
    // The operator is told they can proceed manually
    assert!(body["notice"].as_str().unwrap().contains("proceed manually"));
}

#[tokio::test]
async fn test_failed_scan_keeps_the_session_in_scan() {
    let registry = Arc::new(StubRegistry::new(RegistryBehavior::Accept(
        RecommendedAction::Keep,
    )));
    let clients = stub_clients(
        StubAirlines {
            code: Some("EK".to_string()),
        },
        StubRecognizer {
            behavior: RecognizerBehavior::Respond(rejected_response()),
        },
        registry,
    );
    let app = cbi_is::build_router(test_state(clients));

    let body = json_body(
        app.clone()
            .oneshot(post_json(
                "/inspection/start",
                json!({ "airline": "Emirates" }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let session_id = body["session_id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(post_json(
            &format!("/inspection/{}/flight", session_id),
            json!({ "flight_number": "EK43" }),
        ))
        .await
        .unwrap();

    let body = json_body(
        app.clone()
            .oneshot(post_json(
                &format!("/inspection/{}/scan", session_id),
                json!({ "image": frame() }),
            ))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(body["outcome"], "rejected");
    assert_eq!(body["step"], "scan");
    assert!(body.get("bottle").is_none());
}

#[tokio::test]
async fn test_registration_failure_reaches_done_with_error_marker() {
    let registry = Arc::new(StubRegistry::new(RegistryBehavior::Transport));
    let clients = stub_clients(
        StubAirlines {
            code: Some("EK".to_string()),
        },
        StubRecognizer {
            behavior: RecognizerBehavior::Respond(unmatched_response("456")),
        },
        registry,
    );
    let app = cbi_is::build_router(test_state(clients));

    let body = json_body(
        app.clone()
            .oneshot(post_json(
                "/inspection/start",
                json!({ "airline": "Emirates" }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let session_id = body["session_id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(post_json(
            &format!("/inspection/{}/flight", session_id),
            json!({ "flight_number": "EK43" }),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json(
            &format!("/inspection/{}/scan", session_id),
            json!({ "image": frame() }),
        ))
        .await
        .unwrap();

    let body = json_body(
        app.clone()
            .oneshot(post_json(
                &format!("/inspection/{}/qualitative", session_id),
                json!({}),
            ))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(body["outcome"], "failed");
    assert_eq!(body["step"], "done");
    assert_eq!(body["result"]["registered"], false);
    assert!(body["result"]["error"].as_str().is_some());
}

#[tokio::test]
async fn test_invalid_frame_is_a_bad_request() {
    let (app, _state) = create_test_app();

    let body = json_body(
        app.clone()
            .oneshot(post_json(
                "/inspection/start",
                json!({ "airline": "Lufthansa" }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let session_id = body["session_id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(post_json(
            &format!("/inspection/{}/flight", session_id),
            json!({ "flight_number": "LH9" }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/inspection/{}/scan", session_id),
            json!({ "image": "not base64 at all!!!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_out_of_range_assessment_is_rejected() {
    let (app, _state) = create_test_app();

    let body = json_body(
        app.clone()
            .oneshot(post_json(
                "/inspection/start",
                json!({ "airline": "Lufthansa" }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let session_id = body["session_id"].as_str().unwrap().to_string();

    // fill_level 55 is off the 10-step grid; axum's Json extractor refuses it
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/inspection/{}/qualitative", session_id),
            json!({ "fill_level": 55 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let (app, _state) = create_test_app();

    let response = app
        .oneshot(get(&format!("/inspection/{}", uuid::Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_events_are_broadcast_through_the_bus() {
    let (app, state) = create_test_app();
    let mut rx = state.event_bus.subscribe();

    let body = json_body(
        app.clone()
            .oneshot(post_json(
                "/inspection/start",
                json!({ "airline": "Lufthansa" }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let session_id = body["session_id"].as_str().unwrap().to_string();
    wait_for_airline_code(&app, &session_id).await;

    app.clone()
        .oneshot(post_json(
            &format!("/inspection/{}/flight", session_id),
            json!({ "flight_number": "LH9" }),
        ))
        .await
        .unwrap();

    let mut seen = Vec::new();
    while let Ok(event) = rx.try_recv() {
        seen.push(event.event_type());
    }
    assert_eq!(
        seen,
        vec!["SessionStarted", "AirlineResolved", "FlightAccepted"]
    );
}
