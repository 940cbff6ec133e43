pub mod auth;
pub mod catalog;
pub mod feedback;
pub mod health;
pub mod medical_history;
pub mod prediction;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                     register (public)
/// /auth/login                        login (public)
/// /auth/refresh                      refresh (public)
/// /auth/logout                       logout (requires auth)
///
/// /predictions                       submit (POST, auth), list all with owners (GET)
/// /predictions/version               caller's ledger version (auth)
/// /user/predictions                  caller's history (auth)
///
/// /medical-history                   get, upsert (PUT) (auth)
///
/// /symptoms                          symptom catalogue (auth)
/// /recommendations                   recommendation catalogue (auth)
///
/// /feedback                          list, submit (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/predictions", prediction::router())
        .nest("/user", prediction::user_router())
        .nest("/medical-history", medical_history::router())
        .merge(catalog::router())
        .nest("/feedback", feedback::router())
}
