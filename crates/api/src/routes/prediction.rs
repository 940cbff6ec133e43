//! Route definitions for predictions.

use axum::routing::get;
use axum::Router;

use crate::handlers::prediction;
use crate::state::AppState;

/// Routes mounted at `/predictions`.
///
/// ```text
/// POST /          -> submit (requires auth)
/// GET  /          -> list_all
/// GET  /version   -> version (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(prediction::list_all).post(prediction::submit))
        .route("/version", get(prediction::version))
}

/// Routes mounted at `/user`.
///
/// ```text
/// GET /predictions -> list_mine (requires auth)
/// ```
pub fn user_router() -> Router<AppState> {
    Router::new().route("/predictions", get(prediction::list_mine))
}
