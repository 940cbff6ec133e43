use axum::routing::post;
use axum::Router;

use crate::handlers::auth::{login, logout, refresh, register};
use crate::state::AppState;

/// `/auth`: everything is public except `/logout`, which needs a bearer
/// token.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}
