//! Repository for the `medical_history` table.

use lungrisk_core::types::DbId;
use sqlx::PgPool;

use crate::models::medical_history::{MedicalHistory, UpsertMedicalHistory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, family_history_of_cancer, years_smoking, packs_per_day, \
                        previous_lung_diseases, occupational_exposure, occupational_details, \
                        created_at, updated_at";

/// Provides get / upsert for the one-per-user medical history row.
pub struct MedicalHistoryRepo;

impl MedicalHistoryRepo {
    /// Find the medical history for a user.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<MedicalHistory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM medical_history WHERE user_id = $1");
        sqlx::query_as::<_, MedicalHistory>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert the user's medical history or replace every field of the
    /// existing row.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpsertMedicalHistory,
    ) -> Result<MedicalHistory, sqlx::Error> {
        let query = format!(
            "INSERT INTO medical_history
                (user_id, family_history_of_cancer, years_smoking, packs_per_day,
                 previous_lung_diseases, occupational_exposure, occupational_details)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (user_id) DO UPDATE SET
                family_history_of_cancer = EXCLUDED.family_history_of_cancer,
                years_smoking = EXCLUDED.years_smoking,
                packs_per_day = EXCLUDED.packs_per_day,
                previous_lung_diseases = EXCLUDED.previous_lung_diseases,
                occupational_exposure = EXCLUDED.occupational_exposure,
                occupational_details = EXCLUDED.occupational_details
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MedicalHistory>(&query)
            .bind(user_id)
            .bind(input.family_history_of_cancer)
            .bind(input.years_smoking)
            .bind(input.packs_per_day)
            .bind(&input.previous_lung_diseases)
            .bind(input.occupational_exposure)
            .bind(&input.occupational_details)
            .fetch_one(pool)
            .await
    }
}
