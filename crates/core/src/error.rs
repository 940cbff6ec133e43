//! Domain error type shared by the repository and HTTP layers.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Another writer holds the advisory lock on the target resource.
    #[error("Busy: {0}")]
    Busy(String),

    /// The optimistic version check failed; the caller read stale data.
    #[error("Stale version: {0}")]
    StaleVersion(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
