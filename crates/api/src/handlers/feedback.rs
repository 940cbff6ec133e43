//! Handlers for user feedback.

use axum::extract::State;
use axum::response::IntoResponse;
use lungrisk_core::error::CoreError;
use lungrisk_core::feedback::{validate_feedback_text, validate_rating};
use lungrisk_db::models::feedback::CreateFeedback;
use lungrisk_db::repositories::FeedbackRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::{created, ok};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /feedback
// ---------------------------------------------------------------------------

/// Submit feedback, optionally about one of the caller's predictions.
pub async fn submit(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateFeedback>,
) -> AppResult<impl IntoResponse> {
    validate_rating(input.rating)?;
    validate_feedback_text(&input.feedback_text)?;

    if let Some(prediction_id) = input.prediction_id {
        if !FeedbackRepo::user_owns_prediction(&state.pool, auth.user_id, prediction_id).await? {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Prediction",
                id: prediction_id,
            }));
        }
    }

    let feedback = FeedbackRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        feedback_id = feedback.id,
        user_id = auth.user_id,
        rating = feedback.rating,
        "Feedback submitted",
    );

    Ok(created(feedback))
}

// ---------------------------------------------------------------------------
// GET /feedback
// ---------------------------------------------------------------------------

/// The caller's feedback, newest first, with the referenced prediction label.
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let feedback = FeedbackRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(ok(feedback))
}
