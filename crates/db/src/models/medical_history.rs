//! Medical history model and DTOs (one row per user).

use lungrisk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `medical_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MedicalHistory {
    pub id: DbId,
    pub user_id: DbId,
    pub family_history_of_cancer: Option<bool>,
    pub years_smoking: Option<i32>,
    pub packs_per_day: Option<f64>,
    pub previous_lung_diseases: Option<String>,
    pub occupational_exposure: Option<bool>,
    pub occupational_details: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing the caller's medical history.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertMedicalHistory {
    pub family_history_of_cancer: Option<bool>,
    pub years_smoking: Option<i32>,
    pub packs_per_day: Option<f64>,
    pub previous_lung_diseases: Option<String>,
    pub occupational_exposure: Option<bool>,
    pub occupational_details: Option<String>,
}
