mod harness;

use std::sync::Arc;
use std::time::Duration;

use alertbus::adapter::inbound::http::router;
use alertbus::application::EventBus;
use alertbus::port::Listener;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use harness::{RecordingNotifier, SlowNotifier};

fn app() -> (Router, Arc<EventBus>, RecordingNotifier) {
    let bus = Arc::new(EventBus::new());
    let recorder = RecordingNotifier::new("recorder");
    bus.register(Listener::new(recorder.clone()));
    (router(Arc::clone(&bus)), bus, recorder)
}

async fn call(app: Router, method: Method, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_event(app: Router, body: Value) -> (StatusCode, Value) {
    call(app, Method::POST, "/event", body.to_string()).await
}

async fn wait_for(recorder: &RecordingNotifier, count: usize) {
    for _ in 0..100 {
        if recorder.len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("expected {count} deliveries, saw {}", recorder.len());
}

#[tokio::test]
async fn accepted_event_is_published() {
    let (app, _bus, recorder) = app();

    let (status, body) = post_event(
        app,
        json!({
            "event_type": "price_alert",
            "data": {"symbol": "BTC/USDT", "change": "+5.3%"},
            "priority": "HIGH",
            "notify_threshold": {"field": "change", "abs_gte": 2.0}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["event_type"], "price_alert");
    assert_eq!(body["will_notify"], true);
    assert_eq!(body["priority"], "HIGH");
    assert!(body["event_id"].is_string());

    wait_for(&recorder, 1).await;
    let delivered = &recorder.events()[0];
    assert_eq!(delivered.id().to_string(), body["event_id"]);
}

#[tokio::test]
async fn below_threshold_is_acknowledged_but_not_delivered() {
    let (app, bus, recorder) = app();

    let (status, body) = post_event(
        app,
        json!({
            "event_type": "price_alert",
            "data": {"change": "+1.2%"},
            "notify_threshold": {"field": "change", "abs_gte": 2.0}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["will_notify"], false);
    assert_eq!(body["priority"], "MEDIUM");

    for _ in 0..100 {
        if bus.stats().published == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(bus.stats().published, 1);
    assert!(recorder.is_empty());
}

#[tokio::test]
async fn invalid_json_is_rejected() {
    let (app, _, _) = app();

    let (status, body) = call(app, Method::POST, "/event", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON");
}

#[tokio::test]
async fn missing_event_type_is_rejected() {
    let (app, _, recorder) = app();

    let (status, body) = post_event(app, json!({"data": {"price": 1}})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing 'event_type' field");
    assert!(recorder.is_empty());
}

#[tokio::test]
async fn non_object_data_is_rejected() {
    let (app, _, _) = app();

    let (status, body) = post_event(app, json!({"event_type": "x", "data": "oops"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("string"));
}

#[tokio::test]
async fn unknown_threshold_operator_fails_closed() {
    let (app, _, _) = app();

    let (status, body) = post_event(
        app,
        json!({
            "event_type": "price_alert",
            "data": {"change": 50},
            "notify_threshold": {"field": "change", "roughly": 50}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["will_notify"], false);
}

#[tokio::test]
async fn accepted_event_survives_shutdown_drain() {
    let bus = Arc::new(EventBus::new());
    let slow = SlowNotifier::new("slow", Duration::from_millis(200));
    let completed = slow.completed();
    bus.register(Listener::new(slow));

    let (status, body) = post_event(
        router(Arc::clone(&bus)),
        json!({"event_type": "price_alert", "data": {"change": "+5.3%"}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["will_notify"], true);

    bus.drain().await;

    assert_eq!(completed.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(bus.stats().delivered, 1);
}

#[tokio::test]
async fn health_reports_listeners_and_counters() {
    let (app, _, _) = app();

    let (status, body) = call(app, Method::GET, "/health", Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["listeners"], 1);
    assert_eq!(body["published"], 0);
}

#[tokio::test]
async fn index_describes_usage() {
    let (app, _, _) = app();

    let (status, body) = call(app, Method::GET, "/", Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["example"]["event_type"], "price_alert");
}

#[tokio::test]
async fn unknown_routes_are_404() {
    for (method, uri) in [(Method::GET, "/nope"), (Method::GET, "/event"), (Method::DELETE, "/health")] {
        let (app, _, _) = app();

        let (status, body) = call(app, method, uri, Body::empty()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Endpoint not found");
    }
}
