//! Repository for the `lock_management` table (advisory exclusive locks).
//!
//! Every method accepts any Postgres executor so the coordinator can run
//! acquisition on the pool (visible to other acquirers immediately) and
//! release inside its transaction (visible atomically with the commit).

use chrono::Duration;
use lungrisk_core::concurrency::{lock_types, ResourceRef};
use lungrisk_core::types::DbId;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::lock::{LockRecord, LockToken};

/// Column list for `lock_management` queries.
const COLUMNS: &str = "table_name, record_id, lock_type, lock_holder, lock_token, \
                        lock_timeout, acquired_at";

/// Provides acquisition, release, and inspection of advisory locks.
pub struct LockRepo;

impl LockRepo {
    /// Attempt to acquire an exclusive lock on `resource` for `lease`.
    ///
    /// A single statement inserts the lock, or overwrites an existing row
    /// whose lease has run out. If a live lock exists the upsert's `WHERE`
    /// filters the update away and `None` is returned; the primary key on
    /// `(table_name, record_id)` makes this race-free across connections.
    pub async fn acquire<'e, E>(
        executor: E,
        resource: &ResourceRef,
        holder: DbId,
        lease: Duration,
    ) -> Result<Option<LockRecord>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let lease_secs = lease.num_milliseconds() as f64 / 1000.0;
        let query = format!(
            "INSERT INTO lock_management \
                (table_name, record_id, lock_type, lock_holder, lock_token, lock_timeout) \
             VALUES ($1, $2, $3, $4, $5, NOW() + make_interval(secs => $6)) \
             ON CONFLICT (table_name, record_id) DO UPDATE SET \
                lock_type = EXCLUDED.lock_type, \
                lock_holder = EXCLUDED.lock_holder, \
                lock_token = EXCLUDED.lock_token, \
                lock_timeout = EXCLUDED.lock_timeout, \
                acquired_at = NOW() \
             WHERE lock_management.lock_timeout <= NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LockRecord>(&query)
            .bind(&resource.table_name)
            .bind(resource.record_id)
            .bind(lock_types::EXCLUSIVE)
            .bind(holder)
            .bind(Uuid::new_v4())
            .bind(lease_secs)
            .fetch_optional(executor)
            .await
    }

    /// Release the lock `holder` holds on `resource`.
    ///
    /// Idempotent: releasing a lock that does not exist (or belongs to
    /// someone else) is a successful no-op. Returns `true` if a row was
    /// removed.
    pub async fn release<'e, E>(
        executor: E,
        resource: &ResourceRef,
        holder: DbId,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "DELETE FROM lock_management \
             WHERE table_name = $1 AND record_id = $2 AND lock_holder = $3",
        )
        .bind(&resource.table_name)
        .bind(resource.record_id)
        .bind(holder)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Release exactly the acquisition identified by `token`.
    ///
    /// Returns `false` if the lock is gone or was reclaimed by another
    /// acquirer after its lease expired.
    pub async fn release_token<'e, E>(executor: E, token: &LockToken) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "DELETE FROM lock_management \
             WHERE table_name = $1 AND record_id = $2 AND lock_token = $3",
        )
        .bind(&token.resource.table_name)
        .bind(token.resource.record_id)
        .bind(token.token)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The unexpired lock on `resource`, if any.
    pub async fn find_live<'e, E>(
        executor: E,
        resource: &ResourceRef,
    ) -> Result<Option<LockRecord>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM lock_management \
             WHERE table_name = $1 AND record_id = $2 AND lock_timeout > NOW()"
        );
        sqlx::query_as::<_, LockRecord>(&query)
            .bind(&resource.table_name)
            .bind(resource.record_id)
            .fetch_optional(executor)
            .await
    }

    /// Delete every expired lock row. Returns the number of rows removed.
    ///
    /// Acquisition already reclaims stale rows lazily; this only keeps the
    /// table small.
    pub async fn sweep_expired<'e, E>(executor: E) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM lock_management WHERE lock_timeout <= NOW()")
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
