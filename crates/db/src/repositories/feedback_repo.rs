//! Repository for the `user_feedback` table.

use lungrisk_core::types::DbId;
use sqlx::PgPool;

use crate::models::feedback::{CreateFeedback, Feedback};

/// Provides submit and list operations for feedback.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Insert feedback for `user_id`, returning the row with its prediction label.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateFeedback,
    ) -> Result<Feedback, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            "WITH inserted AS (
                INSERT INTO user_feedback (user_id, prediction_id, feedback_text, rating)
                VALUES ($1, $2, $3, $4)
                RETURNING id, user_id, prediction_id, feedback_text, rating, created_at
             )
             SELECT i.id, i.user_id, i.prediction_id, i.feedback_text, i.rating, i.created_at,
                    p.prediction
             FROM inserted i
             LEFT JOIN predictions p ON i.prediction_id = p.id",
        )
        .bind(user_id)
        .bind(input.prediction_id)
        .bind(&input.feedback_text)
        .bind(input.rating)
        .fetch_one(pool)
        .await
    }

    /// List a user's feedback, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Feedback>, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            "SELECT f.id, f.user_id, f.prediction_id, f.feedback_text, f.rating, f.created_at,
                    p.prediction
             FROM user_feedback f
             LEFT JOIN predictions p ON f.prediction_id = p.id
             WHERE f.user_id = $1
             ORDER BY f.created_at DESC, f.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Whether `user_id` owns `prediction_id`.
    pub async fn user_owns_prediction(
        pool: &PgPool,
        user_id: DbId,
        prediction_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM user_predictions WHERE user_id = $1 AND prediction_id = $2
             )",
        )
        .bind(user_id)
        .bind(prediction_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
