//! Repository for the `user_sessions` table.

use lungrisk_core::types::{DbId, Timestamp};
use sqlx::{PgExecutor, PgPool};

use crate::models::session::{CreateSession, UserSession};

const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, \
                        created_at, updated_at";

/// Issue, rotate, and revoke refresh-token sessions.
pub struct SessionRepo;

impl SessionRepo {
    pub async fn create<'e, E>(executor: E, input: &CreateSession) -> Result<UserSession, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .fetch_one(executor)
            .await
    }

    /// The unrevoked, unexpired session for `token_hash`.
    pub async fn find_active(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions \
             WHERE refresh_token_hash = $1 AND NOT is_revoked AND expires_at > NOW()"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Exchange the active session for `presented_hash` for a new one.
    ///
    /// Revoking the old row and inserting its replacement is one statement,
    /// so two concurrent refreshes with the same token cannot both succeed.
    /// Returns `None` if the presented token is unknown, revoked, or expired.
    pub async fn rotate(
        pool: &PgPool,
        presented_hash: &str,
        replacement_hash: &str,
        expires_at: Timestamp,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "WITH consumed AS ( \
                UPDATE user_sessions SET is_revoked = true \
                WHERE refresh_token_hash = $1 AND NOT is_revoked AND expires_at > NOW() \
                RETURNING user_id \
             ) \
             INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at) \
             SELECT user_id, $2, $3 FROM consumed \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(presented_hash)
            .bind(replacement_hash)
            .bind(expires_at)
            .fetch_optional(pool)
            .await
    }

    /// `false` if the session was already revoked.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE user_sessions SET is_revoked = true WHERE id = $1 AND NOT is_revoked")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Revoke every live session of `user_id`; returns how many were live.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        sqlx::query("UPDATE user_sessions SET is_revoked = true WHERE user_id = $1 AND NOT is_revoked")
            .bind(user_id)
            .execute(pool)
            .await
            .map(|done| done.rows_affected())
    }
}
