//! User feedback model and DTOs.

use lungrisk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `user_feedback` joined with the referenced prediction label.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feedback {
    pub id: DbId,
    pub user_id: DbId,
    pub prediction_id: Option<DbId>,
    pub feedback_text: String,
    pub rating: i32,
    pub created_at: Timestamp,
    /// Label of the referenced prediction, if any.
    pub prediction: Option<String>,
}

/// DTO for submitting feedback.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFeedback {
    pub prediction_id: Option<DbId>,
    pub feedback_text: String,
    pub rating: i32,
}
