use super::*;
use crate::config::Config;
use crate::core_space::{EntryPolicy, Space, SpaceCategory, SpaceRegistry, SpaceService};
use crate::shutdown::{ShutdownCoordinator, ShutdownSignal, ShutdownState};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

fn app() -> Router {
    app_with(SpaceService::seeded(EntryPolicy::Cumulative))
}

fn app_with(spaces: SpaceService) -> Router {
    build_router(Arc::new(AppState::new(spaces)), true)
}

/// One-seat booth for capacity tests
fn booth_service() -> SpaceService {
    let booth = Space::new(1, "Booth", SpaceCategory::Market, "One seat", 1);
    let registry = SpaceRegistry::with_spaces(vec![booth], EntryPolicy::Cumulative).unwrap();
    SpaceService::new(registry)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn enter(app: &Router, space: i64, id: i64, name: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        &format!("/spaces/{}/enter", space),
        Some(json!({ "id": id, "name": name })),
    )
    .await
}

#[tokio::test]
async fn test_welcome() {
    let (status, body) = send(&app(), Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to Kitaverse Backend");
}

#[tokio::test]
async fn test_list_spaces_returns_seed() {
    let (status, body) = send(&app(), Method::GET, "/spaces", None).await;

    assert_eq!(status, StatusCode::OK);
    let spaces = body["spaces"].as_array().unwrap();
    assert_eq!(spaces.len(), 3);
    assert_eq!(spaces[0]["name"], "Community Center");
    assert_eq!(spaces[0]["type"], "meeting");
    assert_eq!(spaces[0]["capacity"], 30);
    assert_eq!(spaces[0]["current_users"], 0);
}

#[tokio::test]
async fn test_get_space() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/spaces/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Festival Grounds");

    let (status, body) = send(&app, Method::GET, "/spaces/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Space not found");
    assert_eq!(body["details"], "not_found");
}

#[tokio::test]
async fn test_non_numeric_space_id_is_rejected() {
    let (status, body) = send(&app(), Method::GET, "/spaces/plaza", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "invalid_request");
}

#[tokio::test]
async fn test_unprovisioned_integer_ids_are_not_found() {
    let app = app();

    for uri in ["/spaces/-1", "/spaces/0", "/spaces/4294967296/users"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["details"], "not_found", "{}", uri);
    }

    let (status, body) = enter(&app, -1, 7, "Ann").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Space not found");

    let (status, _) = send(&app, Method::POST, "/spaces/-5/leave?user_id=7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_enter_space() {
    let app = app();

    let (status, body) = enter(&app, 1, 7, "Ann").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User Ann entered Community Center");
    assert_eq!(body["space"]["current_users"], 1);

    let (_, body) = send(&app, Method::GET, "/spaces/1", None).await;
    assert_eq!(body["current_users"], 1);
}

#[tokio::test]
async fn test_reentry_overwrites_name_as_sent() {
    let app = app();
    enter(&app, 1, 7, "Ann").await;

    let (status, body) = enter(&app, 1, 7, " Annie ").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User  Annie  entered Community Center");

    let (_, body) = send(&app, Method::GET, "/spaces/1/users", None).await;
    assert_eq!(body["users"][0]["name"], " Annie ");
}

#[tokio::test]
async fn test_enter_unknown_space() {
    let (status, body) = enter(&app(), 42, 7, "Ann").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Space not found");
}

#[tokio::test]
async fn test_enter_full_space() {
    let app = app_with(booth_service());

    let (status, _) = enter(&app, 1, 1, "Ann").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = enter(&app, 1, 2, "Ben").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Space is full");
    assert_eq!(body["details"], "space_full");

    let (_, body) = send(&app, Method::GET, "/spaces/1", None).await;
    assert_eq!(body["current_users"], 1);
}

#[tokio::test]
async fn test_enter_rejects_malformed_bodies() {
    let app = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/spaces/1/enter",
        Some(json!({ "name": "Ann" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = enter(&app, 1, 7, "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "invalid_request");

    let (_, body) = send(&app, Method::GET, "/spaces/1", None).await;
    assert_eq!(body["current_users"], 0);
}

#[tokio::test]
async fn test_leave_space() {
    let app = app();
    enter(&app, 2, 7, "Ann").await;

    let (status, body) = send(&app, Method::POST, "/spaces/2/leave?user_id=7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User Ann left Village Market");
    assert_eq!(body["space"]["current_users"], 0);
}

#[tokio::test]
async fn test_leave_failures() {
    let app = app();
    enter(&app, 1, 7, "Ann").await;

    // Known user, wrong space
    let (status, body) = send(&app, Method::POST, "/spaces/2/leave?user_id=7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User is not in this space");
    assert_eq!(body["details"], "not_member");

    let (status, body) = send(&app, Method::POST, "/spaces/1/leave?user_id=8", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, _) = send(&app, Method::POST, "/spaces/1/leave", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::GET, "/spaces/1", None).await;
    assert_eq!(body["current_users"], 1);
}

#[tokio::test]
async fn test_list_occupants() {
    let app = app();
    enter(&app, 3, 9, "Cal").await;
    enter(&app, 3, 4, "Dee").await;
    enter(&app, 1, 5, "Eve").await;

    let (status, body) = send(&app, Method::GET, "/spaces/3/users", None).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Dee", "Cal"]);
    assert_eq!(body["users"][0]["space_id"], 3);

    let (status, _) = send(&app, Method::GET, "/spaces/99/users", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["components"][0]["name"], "registry");
}

#[tokio::test]
async fn test_readiness_follows_registry_health() {
    let (status, body) = send(&app(), Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);

    // Full spaces degrade health but still take leave requests
    let app = app_with(booth_service());
    enter(&app, 1, 1, "Ann").await;
    let (status, _) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);

    let empty = SpaceRegistry::with_spaces(Vec::<Space>::new(), EntryPolicy::Cumulative).unwrap();
    let app = app_with(SpaceService::new(empty));
    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);
}

#[tokio::test]
async fn test_health_degrades_when_every_space_is_full() {
    let app = app_with(booth_service());
    enter(&app, 1, 1, "Ann").await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_metrics_route_follows_handle() {
    let (status, _) = send(&app(), Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let handle = PrometheusBuilder::new().build_recorder().handle();
    let state = AppState::new(SpaceService::default()).with_metrics(handle);
    let app = build_router(Arc::new(state), false);

    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cors_headers() {
    let request = Request::get("/spaces")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_server_over_tcp_with_graceful_shutdown() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Arc::new(ShutdownCoordinator::new(Duration::from_secs(5)));
    let state = AppState::new(SpaceService::default());
    let server = ApiServer::new(state, &Config::default(), shutdown.clone());
    let handle = tokio::spawn(server.serve(listener));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /spaces/1 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains("Community Center"));

    shutdown.shutdown().await;
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop after shutdown")
        .unwrap();
    assert!(result.is_ok());
    assert!(shutdown.is_shutting_down().await);
}

#[tokio::test]
async fn test_second_stop_request_cuts_drain_short() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Arc::new(ShutdownCoordinator::new(Duration::from_secs(600)));
    let state = AppState::new(SpaceService::default());
    let server = ApiServer::new(state, &Config::default(), shutdown.clone());
    let handle = tokio::spawn(server.serve(listener));

    // A request that never finishes arriving keeps the connection busy
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"POST /spaces/1/enter HTTP/1.1\r\nHost: localhost\r\nContent-Length: 64\r\n\r\n{")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(shutdown.request_shutdown().await, ShutdownSignal::Graceful);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(shutdown.request_shutdown().await, ShutdownSignal::Immediate);

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop once shutdown is forced")
        .unwrap();
    assert!(result.is_ok());
    assert_eq!(shutdown.state().await, ShutdownState::Shutdown);
    drop(stream);
}
