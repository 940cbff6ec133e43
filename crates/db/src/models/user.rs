//! Account rows and their public projection.

use lungrisk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A `users` row. Not `Serialize`: responses go through [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(
        User {
            id,
            name,
            email,
            created_at,
            ..
        }: User,
    ) -> Self {
        Self {
            id,
            name,
            email,
            created_at,
        }
    }
}

/// New account; `password_hash` is an Argon2id PHC string.
#[derive(Debug)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
