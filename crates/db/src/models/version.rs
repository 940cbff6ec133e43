//! Optimistic version counters from `version_control`.

use lungrisk_core::types::{DbId, Timestamp, Version};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `version_control` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VersionRecord {
    pub table_name: String,
    pub record_id: DbId,
    pub version_number: Version,
    pub modified_by: DbId,
    pub updated_at: Timestamp,
}
