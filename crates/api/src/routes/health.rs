use axum::routing::get;
use axum::Router;

use crate::handlers::health::health_check;
use crate::state::AppState;

/// `/health`, merged at the root next to `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
