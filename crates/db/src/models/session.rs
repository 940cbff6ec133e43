//! Refresh-token sessions.

use lungrisk_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// One issued refresh token. Only the SHA-256 of the token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    /// Set on logout and when the token is exchanged by a refresh.
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
