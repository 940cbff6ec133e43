//! Repository for the `version_control` table (optimistic version ledger).

use lungrisk_core::concurrency::{ResourceRef, INITIAL_VERSION};
use lungrisk_core::types::{DbId, Version};
use sqlx::PgExecutor;

use crate::models::version::VersionRecord;

/// Column list for `version_control` queries.
const COLUMNS: &str = "table_name, record_id, version_number, modified_by, updated_at";

/// Provides the bump / check operations of the version ledger.
pub struct VersionRepo;

impl VersionRepo {
    /// Atomically create the record at version 1 or increment it by one.
    ///
    /// Returns the new version number.
    pub async fn bump<'e, E>(
        executor: E,
        resource: &ResourceRef,
        modifier: DbId,
    ) -> Result<Version, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: (Version,) = sqlx::query_as(
            "INSERT INTO version_control (table_name, record_id, version_number, modified_by) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (table_name, record_id) DO UPDATE SET \
                version_number = version_control.version_number + 1, \
                modified_by = EXCLUDED.modified_by, \
                updated_at = NOW() \
             RETURNING version_number",
        )
        .bind(&resource.table_name)
        .bind(resource.record_id)
        .bind(INITIAL_VERSION)
        .bind(modifier)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }

    /// `true` only if a record exists for `resource` at exactly `expected`.
    pub async fn check<'e, E>(
        executor: E,
        resource: &ResourceRef,
        expected: Version,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS ( \
                SELECT 1 FROM version_control \
                WHERE table_name = $1 AND record_id = $2 AND version_number = $3 \
             )",
        )
        .bind(&resource.table_name)
        .bind(resource.record_id)
        .bind(expected)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }

    /// Current version number, or `None` if the resource was never written.
    pub async fn current<'e, E>(
        executor: E,
        resource: &ResourceRef,
    ) -> Result<Option<Version>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: Option<(Version,)> = sqlx::query_as(
            "SELECT version_number FROM version_control \
             WHERE table_name = $1 AND record_id = $2",
        )
        .bind(&resource.table_name)
        .bind(resource.record_id)
        .fetch_optional(executor)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Full ledger row for `resource`.
    pub async fn find<'e, E>(
        executor: E,
        resource: &ResourceRef,
    ) -> Result<Option<VersionRecord>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM version_control WHERE table_name = $1 AND record_id = $2"
        );
        sqlx::query_as::<_, VersionRecord>(&query)
            .bind(&resource.table_name)
            .bind(resource.record_id)
            .fetch_optional(executor)
            .await
    }
}
