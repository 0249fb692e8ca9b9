use std::sync::Arc;

use ambqueue::{queue_api_router, HostPredicate, QueueManager};
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

const HOST_COOKIE: &str = "session=host";

fn host_predicate() -> HostPredicate {
    Arc::new(|headers: &HeaderMap| {
        headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == HOST_COOKIE)
    })
}

fn app() -> (Router, QueueManager) {
    let manager = QueueManager::in_memory();
    (queue_api_router(manager.clone(), host_predicate()), manager)
}

fn request(method: Method, uri: &str, body: Option<&str>, host: bool) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if host {
        builder = builder.header(header::COOKIE, HOST_COOKIE);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn add(router: &Router, name: &str) -> Value {
    let body = json!({ "name": name }).to_string();
    let (status, list) = send(router, request(Method::POST, "/api/queue", Some(&body), false)).await;
    assert_eq!(status, StatusCode::CREATED);
    list
}

fn names(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect()
}

fn id_of<'a>(list: &'a Value, name: &str) -> &'a str {
    list.as_array()
        .unwrap()
        .iter()
        .find(|e| e["name"] == name)
        .and_then(|e| e["id"].as_str())
        .unwrap()
}

#[tokio::test]
async fn test_list_starts_empty() {
    let (router, _) = app();
    let (status, list) = send(&router, request(Method::GET, "/api/queue", None, false)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_add_returns_projection() {
    let (router, _) = app();
    let list = add(&router, "  Alice ").await;

    let entry = &list[0];
    assert_eq!(entry["name"], "Alice");
    assert_eq!(entry["isCurrentlySinging"], false);
    assert!(entry["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(entry["addedAt"].as_i64().is_some_and(|ts| ts > 0));
}

#[tokio::test]
async fn test_add_rejects_missing_or_blank_names() {
    let (router, manager) = app();
    for body in [r#"{"name":"   "}"#, r#"{}"#, r#"{"name":12}"#, "not json", ""] {
        let (status, error) =
            send(&router, request(Method::POST, "/api/queue", Some(body), false)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", body);
        assert_eq!(error["error"], "VALIDATION_ERROR");
        assert_eq!(error["message"], "Name is required");
    }
    assert!(manager.is_empty().await);
}

#[tokio::test]
async fn test_host_routes_require_session() {
    let (router, manager) = app();
    let list = add(&router, "Alice").await;
    let id = id_of(&list, "Alice").to_string();

    let attempts = [
        (Method::PATCH, "/api/queue/reorder".to_string(), Some(r#"{"orderedIds":[]}"#)),
        (Method::PATCH, "/api/queue/currently-singing".to_string(), Some(r#"{"id":null}"#)),
        (Method::POST, format!("/api/queue/{}/move-to-bottom", id), None),
        (Method::DELETE, format!("/api/queue/{}", id), None),
    ];
    for (method, uri, body) in attempts {
        let (status, error) = send(&router, request(method, &uri, body, false)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(error["error"], "UNAUTHORIZED");
    }
    assert_eq!(manager.len().await, 1);
}

#[tokio::test]
async fn test_reorder_partial_and_lenient() {
    let (router, _) = app();
    add(&router, "a").await;
    add(&router, "b").await;
    let list = add(&router, "c").await;
    let b = id_of(&list, "b").to_string();

    let body = json!({ "orderedIds": [b, "ghost", 7, b] }).to_string();
    let (status, list) =
        send(&router, request(Method::PATCH, "/api/queue/reorder", Some(&body), true)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&list), vec!["b", "a", "c"]);

    // orderedIds absent ou d'un autre type : ordre inchangé
    let (status, list) = send(
        &router,
        request(Method::PATCH, "/api/queue/reorder", Some(r#"{"orderedIds":"b"}"#), true),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&list), vec!["b", "a", "c"]);
}

#[tokio::test]
async fn test_currently_singing() {
    let (router, _) = app();
    add(&router, "Alice").await;
    let list = add(&router, "Bob").await;
    let bob = id_of(&list, "Bob").to_string();

    let body = json!({ "id": bob }).to_string();
    let (status, list) = send(
        &router,
        request(Method::PATCH, "/api/queue/currently-singing", Some(&body), true),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["isCurrentlySinging"], false);
    assert_eq!(list[1]["isCurrentlySinging"], true);

    let (status, error) = send(
        &router,
        request(Method::PATCH, "/api/queue/currently-singing", Some(r#"{"id":"ghost"}"#), true),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "NOT_FOUND");

    let (status, list) = send(
        &router,
        request(Method::PATCH, "/api/queue/currently-singing", Some(r#"{"id":null}"#), true),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(list
        .as_array()
        .unwrap()
        .iter()
        .all(|e| e["isCurrentlySinging"] == false));
}

#[tokio::test]
async fn test_move_to_bottom_clears_current() {
    let (router, _) = app();
    let list = add(&router, "a").await;
    let a = id_of(&list, "a").to_string();
    add(&router, "b").await;
    add(&router, "c").await;

    let body = json!({ "id": a }).to_string();
    send(
        &router,
        request(Method::PATCH, "/api/queue/currently-singing", Some(&body), true),
    )
    .await;

    let uri = format!("/api/queue/{}/move-to-bottom", a);
    let (status, list) = send(&router, request(Method::POST, &uri, None, true)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&list), vec!["b", "c", "a"]);
    assert_eq!(list[2]["isCurrentlySinging"], false);

    let (status, _) = send(
        &router,
        request(Method::POST, "/api/queue/ghost/move-to-bottom", None, true),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove() {
    let (router, _) = app();
    add(&router, "a").await;
    let list = add(&router, "b").await;
    let b = id_of(&list, "b").to_string();

    let (status, list) =
        send(&router, request(Method::DELETE, &format!("/api/queue/{}", b), None, true)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&list), vec!["a"]);

    let (status, error) =
        send(&router, request(Method::DELETE, &format!("/api/queue/{}", b), None, true)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_missing_path_id_is_bad_request() {
    let (router, _) = app();
    add(&router, "a").await;

    let (status, error) = send(&router, request(Method::DELETE, "/api/queue/", None, true)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "VALIDATION_ERROR");

    let (status, _) = send(&router, request(Method::DELETE, "/api/queue/%20", None, true)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        request(Method::POST, "/api/queue/%20/move-to-bottom", None, true),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
