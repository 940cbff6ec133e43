//! Tests for `AppError` -> HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is needed.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use lungrisk_api::error::AppError;
use lungrisk_core::concurrency::ResourceRef;
use lungrisk_core::error::CoreError;
use lungrisk_db::coordinator::TransactionError;
use lungrisk_db::submission::SubmissionError;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn resource() -> ResourceRef {
    ResourceRef::new("predictions", 7)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Prediction",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Prediction with id 42 not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("age: Age must be between 0 and 120".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "age: Age must be between 0 and 120");
}

#[tokio::test]
async fn lock_denied_returns_503_busy() {
    let err = AppError::from(TransactionError::LockDenied {
        resource: resource(),
        holder: Some(3),
        expires_at: None,
    });
    assert_matches!(err, AppError::Core(CoreError::Busy(_)));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "BUSY");
    assert!(json["error"].as_str().unwrap().contains("retry"));
}

#[tokio::test]
async fn lost_lock_is_reported_as_busy() {
    let err = AppError::from(TransactionError::LockLost {
        resource: resource(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "BUSY");
}

#[tokio::test]
async fn version_conflict_returns_409() {
    let err = AppError::from(TransactionError::VersionConflict {
        resource: resource(),
        expected: Some(1),
        actual: Some(2),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "VERSION_CONFLICT");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("reload and retry"));
    assert!(message.contains("expected version 1, found 2"));
}

#[tokio::test]
async fn storage_failure_is_sanitized() {
    let err = AppError::from(TransactionError::Storage(sqlx::Error::PoolTimedOut));
    assert_matches!(err, AppError::Database(_));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn invalid_submission_maps_to_validation_error() {
    let err = AppError::from(SubmissionError::Invalid(CoreError::Validation(
        "gender: must be 'Male' or 'Female'".into(),
    )));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn aborted_work_keeps_domain_error() {
    let err = AppError::from(SubmissionError::Transaction(TransactionError::Aborted(
        CoreError::Conflict("duplicate".into()),
    )));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn unauthorized_error_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}
