//! HTTP error type.
//!
//! Every failure leaves the API as `{ "error": message, "code": CODE }`.
//! Internal details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lungrisk_core::error::CoreError;
use lungrisk_db::coordinator::TransactionError;
use lungrisk_db::submission::SubmissionError;
use serde::Serialize;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unexpected failure outside the domain (hashing, signing). The message
    /// is logged only.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::LockDenied { .. } | TransactionError::LockLost { .. } => {
                AppError::Core(CoreError::Busy(
                    "System busy: another request is writing, please retry".into(),
                ))
            }
            TransactionError::VersionConflict {
                expected, actual, ..
            } => AppError::Core(CoreError::StaleVersion(format!(
                "Stale data, reload and retry (expected version {}, found {})",
                describe_version(expected),
                describe_version(actual),
            ))),
            TransactionError::Storage(e) => AppError::Database(e),
            TransactionError::Aborted(e) => AppError::Core(e),
        }
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Invalid(e) => AppError::Core(e),
            SubmissionError::Transaction(e) => e.into(),
        }
    }
}

fn describe_version(version: Option<i32>) -> String {
    version.map_or_else(|| "none".to_string(), |v| v.to_string())
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        let (status, code, error) = match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => database_parts(err),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };
        (status, ErrorBody { error, code })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

fn core_parts(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::StaleVersion(msg) => (StatusCode::CONFLICT, "VERSION_CONFLICT", msg.clone()),
        CoreError::Busy(msg) => {
            tracing::warn!(error = %msg, "Write rejected while resource busy");
            (StatusCode::SERVICE_UNAVAILABLE, "BUSY", msg.clone())
        }
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal domain error");
            internal()
        }
    }
}

/// Unique violations on named `uq_*` constraints become 409; anything else
/// is a sanitized 500.
fn database_parts(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if let sqlx::Error::RowNotFound = err {
        return (StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found".to_string());
    }

    let unique_constraint = err
        .as_database_error()
        .filter(|db| db.is_unique_violation())
        .and_then(|db| db.constraint())
        .filter(|name| name.starts_with("uq_"));

    match unique_constraint {
        Some("uq_users_email") => (
            StatusCode::CONFLICT,
            "CONFLICT",
            "An account with this email already exists".to_string(),
        ),
        Some(name) => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {name}"),
        ),
        None => {
            tracing::error!(error = %err, "Database error");
            internal()
        }
    }
}
