//! Repositories for the read-only `symptoms` and `recommendations` tables.

use sqlx::PgPool;

use crate::models::catalog::{Recommendation, Symptom};

pub struct SymptomRepo;

impl SymptomRepo {
    /// List all symptoms ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Symptom>, sqlx::Error> {
        sqlx::query_as::<_, Symptom>("SELECT id, name, description FROM symptoms ORDER BY name")
            .fetch_all(pool)
            .await
    }
}

pub struct RecommendationRepo;

impl RecommendationRepo {
    /// List recommendations, optionally restricted to one risk category.
    pub async fn list(
        pool: &PgPool,
        risk_category: Option<&str>,
    ) -> Result<Vec<Recommendation>, sqlx::Error> {
        sqlx::query_as::<_, Recommendation>(
            "SELECT id, risk_category, title, body FROM recommendations
             WHERE $1::TEXT IS NULL OR risk_category = $1
             ORDER BY id",
        )
        .bind(risk_category)
        .fetch_all(pool)
        .await
    }
}
