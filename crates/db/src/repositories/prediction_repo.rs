//! Repository for the `predictions` and `user_predictions` tables.

use lungrisk_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::prediction::{CreatePrediction, Prediction, PredictionWithOwner};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, age, gender, smoking, cough, chest_pain, fatigue, \
                        shortness_of_breath, prediction, risk_score, prediction_date, version";

/// Same columns qualified with the `p` alias for joins.
const P_COLUMNS: &str = "p.id, p.age, p.gender, p.smoking, p.cough, p.chest_pain, p.fatigue, \
                          p.shortness_of_breath, p.prediction, p.risk_score, p.prediction_date, \
                          p.version";

/// Provides insert and listing operations for predictions.
pub struct PredictionRepo;

impl PredictionRepo {
    /// Insert a scored prediction, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreatePrediction) -> Result<Prediction, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO predictions
                (age, gender, smoking, cough, chest_pain, fatigue, shortness_of_breath,
                 prediction, risk_score, version)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prediction>(&query)
            .bind(input.age)
            .bind(&input.gender)
            .bind(&input.smoking)
            .bind(&input.cough)
            .bind(&input.chest_pain)
            .bind(&input.fatigue)
            .bind(&input.shortness_of_breath)
            .bind(&input.prediction)
            .bind(input.risk_score)
            .bind(input.version)
            .fetch_one(executor)
            .await
    }

    /// Record `user_id` as the owner of `prediction_id`.
    pub async fn link_owner<'e, E>(
        executor: E,
        user_id: DbId,
        prediction_id: DbId,
    ) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("INSERT INTO user_predictions (user_id, prediction_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(prediction_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Find a prediction by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Prediction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM predictions WHERE id = $1");
        sqlx::query_as::<_, Prediction>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's predictions, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Prediction>, sqlx::Error> {
        let query = format!(
            "SELECT {P_COLUMNS} FROM predictions p
             JOIN user_predictions up ON p.id = up.prediction_id
             WHERE up.user_id = $1
             ORDER BY p.prediction_date DESC, p.id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Prediction>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List every owned prediction with its owner's name and email, newest first.
    pub async fn list_with_owners(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PredictionWithOwner>, sqlx::Error> {
        let query = format!(
            "SELECT {P_COLUMNS}, u.id AS user_id, u.name AS user_name, u.email AS user_email
             FROM predictions p
             JOIN user_predictions up ON p.id = up.prediction_id
             JOIN users u ON up.user_id = u.id
             ORDER BY p.prediction_date DESC, p.id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, PredictionWithOwner>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
