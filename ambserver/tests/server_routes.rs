use ambserver::{HOST_COOKIE, HostAuth, LoggingOptions, ServerBuilder};
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn login_request(password: &str) -> Request<Body> {
    Request::post("/host/auth")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("password={}", password)))
        .unwrap()
}

#[tokio::test]
async fn test_add_route_serves_json() {
    let mut server = ServerBuilder::new("Test", "localhost", 0).build();
    server
        .add_route("/info", || async { serde_json::json!({"version": "1.0.0"}) })
        .await;

    let response = server
        .router()
        .await
        .oneshot(Request::get("/info").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["version"], "1.0.0");
}

#[tokio::test]
async fn test_host_login_sets_cookie() {
    let mut server = ServerBuilder::new("Test", "localhost", 0).build();
    let auth = server.init_host_auth(HostAuth::new("4321")).await;
    let router = server.router().await;

    let response = router.clone().oneshot(login_request("4321")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/host");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with(&format!("{}={}", HOST_COOKIE, auth.token())));
    assert!(cookie.contains("HttpOnly"));

    let response = router.oneshot(login_request("nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/host?error=1");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_host_login_without_form_is_rejected_softly() {
    let mut server = ServerBuilder::new("Test", "localhost", 0).build();
    server.init_host_auth(HostAuth::new("4321")).await;

    let request = Request::post("/host/auth").body(Body::empty()).unwrap();
    let response = server.router().await.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/host?error=1");
}

#[tokio::test]
async fn test_host_session_reports_cookie() {
    let mut server = ServerBuilder::new("Test", "localhost", 0).build();
    let auth = server.init_host_auth(HostAuth::new("4321")).await;
    let router = server.router().await;

    let anonymous = Request::get("/host/session").body(Body::empty()).unwrap();
    let response = router.clone().oneshot(anonymous).await.unwrap();
    assert_eq!(body_json(response).await["host"], false);

    let with_cookie = Request::get("/host/session")
        .header(header::COOKIE, format!("{}={}", HOST_COOKIE, auth.token()))
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(with_cookie).await.unwrap();
    assert_eq!(body_json(response).await["host"], true);
}

#[tokio::test]
async fn test_log_setup_routes() {
    let mut server = ServerBuilder::new("Test", "localhost", 0).build();
    server
        .init_logging(LoggingOptions {
            enable_console: false,
            ..Default::default()
        })
        .await;
    let router = server.router().await;

    let request = Request::post("/api/logs/log_setup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"level":"debug"}"#))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["current_level"], "DEBUG");

    let request = Request::post("/api/logs/log_setup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"level":"loud"}"#))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(Request::get("/log-dump").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.is_array());
}
