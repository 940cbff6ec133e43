//! Health endpoint and the middleware every route shares.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use sqlx::PgPool;
use tower::ServiceExt;

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/predictions")
        .header("origin", origin)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "authorization,content-type")
        .body(Body::empty())
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_database_status(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_lives_outside_the_api_prefix(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/health").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn request_id_is_generated_when_absent(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/health").await;

    let id = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(id.len(), 36);
    assert_eq!(id.matches('-').count(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn caller_request_id_is_echoed(pool: PgPool) {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();

    let response = common::build_test_app(pool).oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-me-123");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn preflight_from_configured_origin_is_allowed(pool: PgPool) {
    let response = common::build_test_app(pool)
        .oneshot(preflight("http://localhost:5173"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "http://localhost:5173");
    assert_eq!(headers["access-control-allow-credentials"], "true");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn preflight_from_unknown_origin_gets_no_grant(pool: PgPool) {
    let response = common::build_test_app(pool)
        .oneshot(preflight("https://evil.example"))
        .await
        .unwrap();

    assert!(response.headers().get("access-control-allow-origin").is_none());
}
