//! Handlers for the caller's medical history (one record per user).

use axum::extract::State;
use axum::response::IntoResponse;
use lungrisk_core::error::CoreError;
use lungrisk_core::medical_history::{validate_packs_per_day, validate_text, validate_years_smoking};
use lungrisk_db::models::medical_history::UpsertMedicalHistory;
use lungrisk_db::repositories::MedicalHistoryRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::ok;
use crate::state::AppState;

/// GET /medical-history
pub async fn get_mine(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let history = MedicalHistoryRepo::find_by_user(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MedicalHistory",
            id: auth.user_id,
        }))?;

    Ok(ok(history))
}

/// PUT /medical-history
///
/// Create the record or replace every field of the existing one.
pub async fn upsert_mine(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpsertMedicalHistory>,
) -> AppResult<impl IntoResponse> {
    validate_years_smoking(input.years_smoking)?;
    validate_packs_per_day(input.packs_per_day)?;
    validate_text("previous_lung_diseases", input.previous_lung_diseases.as_deref())?;
    validate_text("occupational_details", input.occupational_details.as_deref())?;

    let history = MedicalHistoryRepo::upsert(&state.pool, auth.user_id, &input).await?;

    tracing::info!(user_id = auth.user_id, "Medical history saved");

    Ok(ok(history))
}
