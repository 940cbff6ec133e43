use axum::routing::get;
use axum::Router;

use crate::handlers::medical_history;
use crate::state::AppState;

/// Routes mounted at `/medical-history`.
///
/// ```text
/// GET /  -> get_mine
/// PUT /  -> upsert_mine
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(medical_history::get_mine).put(medical_history::upsert_mine),
    )
}
