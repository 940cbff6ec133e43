//! Handlers for the read-only symptom and recommendation catalogues.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use lungrisk_core::error::CoreError;
use lungrisk_db::repositories::{RecommendationRepo, SymptomRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::ok;
use crate::state::AppState;

const RISK_CATEGORIES: &[&str] = &["Low", "Moderate", "High"];

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationParams {
    pub risk_category: Option<String>,
}

/// GET /symptoms
pub async fn list_symptoms(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let symptoms = SymptomRepo::list(&state.pool).await?;
    Ok(ok(symptoms))
}

/// GET /recommendations?risk_category=High
pub async fn list_recommendations(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<RecommendationParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref category) = params.risk_category {
        if !RISK_CATEGORIES.contains(&category.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid risk_category '{category}'. Must be one of: {}",
                RISK_CATEGORIES.join(", ")
            ))));
        }
    }

    let recommendations =
        RecommendationRepo::list(&state.pool, params.risk_category.as_deref()).await?;
    Ok(ok(recommendations))
}
