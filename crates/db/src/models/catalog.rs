//! Read-only reference catalogues seeded by migration.

use lungrisk_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `symptoms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Symptom {
    pub id: DbId,
    pub name: String,
    pub description: String,
}

/// A row from the `recommendations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Recommendation {
    pub id: DbId,
    /// `Low`, `Moderate`, or `High`.
    pub risk_category: String,
    pub title: String,
    pub body: String,
}
