//! Request body extractor that reports malformed JSON in the API's error shape.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use lungrisk_core::error::CoreError;

use crate::error::AppError;

/// `axum::Json` whose rejection is an [`AppError`], so a body with a wrong
/// type, a missing field, or bad syntax answers 400 `VALIDATION_ERROR`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        tracing::debug!(status = %rejection.status(), error = %message, "Rejected request body");
        AppError::Core(CoreError::Validation(message))
    }
}
