use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Catalogue routes, merged at the `/api/v1` root.
///
/// ```text
/// GET /symptoms         -> list_symptoms
/// GET /recommendations  -> list_recommendations
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/symptoms", get(catalog::list_symptoms))
        .route("/recommendations", get(catalog::list_recommendations))
}
