//! Integration tests for authentication middleware
//!
//! The middleware only trusts identity headers set by the upstream proxy and
//! must reject requests that carry none.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    routing::get,
    Router,
};
use hub_api::auth::{auth_middleware, AuthenticatedUser};
use tower::ServiceExt; // for `oneshot`

async fn test_handler(
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "user_id": user.user_id }))
}

fn create_test_app() -> Router {
    Router::new()
        .route("/protected", get(test_handler))
        .layer(middleware::from_fn(auth_middleware))
}

async fn user_id_for(headers: &[(&str, &str)]) -> (StatusCode, Option<String>) {
    let mut builder = Request::builder().uri("/protected");
    for (k, v) in headers {
        builder = builder.header(*k, *v);
    }

    let response = create_test_app()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    if status != StatusCode::OK {
        return (status, None);
    }

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json["user_id"].as_str().map(str::to_string))
}

#[tokio::test]
async fn test_valid_x_user_header_passes() {
    let (status, user) = user_id_for(&[("x-user", "user-1")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user.as_deref(), Some("user-1"));
}

#[tokio::test]
async fn test_x_hub_user_header_passes() {
    let (status, user) = user_id_for(&[("x-hub-user", "user-2")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user.as_deref(), Some("user-2"));
}

#[tokio::test]
async fn test_x_forwarded_user_header_works() {
    let (status, user) = user_id_for(&[("x-forwarded-user", "user-3")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user.as_deref(), Some("user-3"));
}

#[tokio::test]
async fn test_header_priority() {
    let (_, user) = user_id_for(&[
        ("x-user", "dev"),
        ("x-forwarded-user", "proxy"),
        ("x-hub-user", "hub"),
    ])
    .await;
    assert_eq!(user.as_deref(), Some("hub"));

    let (_, user) = user_id_for(&[("x-user", "dev"), ("x-forwarded-user", "proxy")]).await;
    assert_eq!(user.as_deref(), Some("proxy"));
}

#[tokio::test]
async fn test_value_is_trimmed() {
    let (_, user) = user_id_for(&[("x-user", "  padded  ")]).await;
    assert_eq!(user.as_deref(), Some("padded"));
}

#[tokio::test]
async fn test_missing_user_header_returns_401() {
    let (status, _) = user_id_for(&[]).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_header_value_returns_401() {
    let (status, _) = user_id_for(&[("x-user", "")]).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = user_id_for(&[("x-user", "   ")]).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_utf8_header_returns_401() {
    let request = Request::builder()
        .uri("/protected")
        .header("x-user", &[0xFF, 0xFE][..])
        .body(Body::empty())
        .unwrap();

    let response = create_test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
