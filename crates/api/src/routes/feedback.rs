use axum::routing::get;
use axum::Router;

use crate::handlers::feedback;
use crate::state::AppState;

/// Routes mounted at `/feedback`.
///
/// ```text
/// GET  /  -> list_mine
/// POST /  -> submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(feedback::list_mine).post(feedback::submit))
}
