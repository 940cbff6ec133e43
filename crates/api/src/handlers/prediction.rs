//! Handlers for prediction submission and history.
//!
//! Submissions go through the transaction coordinator: a concurrent write to
//! the same resource yields 503 `BUSY`, a stale `expected_version` yields
//! 409 `VERSION_CONFLICT`.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use lungrisk_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use lungrisk_core::prediction::PredictionInput;
use lungrisk_core::types::{DbId, Timestamp};
use lungrisk_db::models::prediction::{Prediction, PredictionListParams};
use lungrisk_db::repositories::PredictionRepo;
use lungrisk_db::submission::{current_version, submit_prediction};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::{created, ok};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /predictions`.
#[derive(Debug, Deserialize)]
pub struct SubmitPredictionRequest {
    #[serde(flatten)]
    pub input: PredictionInput,
    /// Version the client last observed; omitted means "latest".
    #[serde(default)]
    pub expected_version: Option<i32>,
}

/// Result of a committed submission.
#[derive(Debug, Serialize)]
pub struct PredictionResult {
    pub id: DbId,
    pub prediction: String,
    pub risk_score: f64,
    pub timestamp: Timestamp,
    pub version: i32,
}

impl From<Prediction> for PredictionResult {
    fn from(p: Prediction) -> Self {
        Self {
            id: p.id,
            prediction: p.prediction,
            risk_score: p.risk_score,
            timestamp: p.prediction_date,
            version: p.version,
        }
    }
}

/// Ledger state of the caller's prediction resource.
#[derive(Debug, Serialize)]
pub struct VersionInfo {
    pub resource: String,
    pub lock_scope: &'static str,
    /// `null` until the first prediction is committed.
    pub version: Option<i32>,
}

// ---------------------------------------------------------------------------
// POST /predictions
// ---------------------------------------------------------------------------

/// Score and store a prediction for the caller.
pub async fn submit(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(body): AppJson<SubmitPredictionRequest>,
) -> AppResult<impl IntoResponse> {
    let ctx = state.submission_context(auth.user_id);

    let committed =
        submit_prediction(&state.coordinator, &ctx, &body.input, body.expected_version).await?;

    Ok(created(PredictionResult::from(committed.value)))
}

// ---------------------------------------------------------------------------
// GET /predictions
// ---------------------------------------------------------------------------

/// List every owned prediction with its owner's name and email.
pub async fn list_all(
    State(state): State<AppState>,
    Query(params): Query<PredictionListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);

    let predictions = PredictionRepo::list_with_owners(&state.pool, limit, offset).await?;
    Ok(ok(predictions))
}

// ---------------------------------------------------------------------------
// GET /predictions/version
// ---------------------------------------------------------------------------

/// Current ledger version of the resource the caller's writes contend on.
pub async fn version(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let ctx = state.submission_context(auth.user_id);
    let version = current_version(&state.pool, &ctx).await?;

    Ok(ok(VersionInfo {
        resource: ctx.resource().to_string(),
        lock_scope: ctx.lock_scope.as_str(),
        version,
    }))
}

// ---------------------------------------------------------------------------
// GET /user/predictions
// ---------------------------------------------------------------------------

/// The caller's prediction history, newest first.
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PredictionListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);

    let predictions =
        PredictionRepo::list_for_user(&state.pool, auth.user_id, limit, offset).await?;
    Ok(ok(predictions))
}
