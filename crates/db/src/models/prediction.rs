//! Prediction entity model and DTOs.

use lungrisk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `predictions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Prediction {
    pub id: DbId,
    pub age: i32,
    pub gender: String,
    pub smoking: String,
    pub cough: String,
    pub chest_pain: String,
    pub fatigue: String,
    pub shortness_of_breath: String,
    pub prediction: String,
    pub risk_score: f64,
    pub prediction_date: Timestamp,
    /// Version ledger value for the protected resource at the time of write.
    pub version: i32,
}

/// A prediction joined with its owner, for the all-users listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PredictionWithOwner {
    pub id: DbId,
    pub age: i32,
    pub gender: String,
    pub smoking: String,
    pub cough: String,
    pub chest_pain: String,
    pub fatigue: String,
    pub shortness_of_breath: String,
    pub prediction: String,
    pub risk_score: f64,
    pub prediction_date: Timestamp,
    pub version: i32,
    pub user_id: DbId,
    pub user_name: String,
    pub user_email: String,
}

/// DTO for inserting a scored prediction.
#[derive(Debug, Clone)]
pub struct CreatePrediction {
    pub age: i32,
    pub gender: String,
    pub smoking: String,
    pub cough: String,
    pub chest_pain: String,
    pub fatigue: String,
    pub shortness_of_breath: String,
    pub prediction: String,
    pub risk_score: f64,
    pub version: i32,
}

/// Query parameters for prediction listings.
#[derive(Debug, Default, Deserialize)]
pub struct PredictionListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
