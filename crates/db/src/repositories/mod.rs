//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or, where the transaction coordinator needs them, any
//! `PgExecutor`) as the first argument.

pub mod catalog_repo;
pub mod feedback_repo;
pub mod lock_repo;
pub mod medical_history_repo;
pub mod prediction_repo;
pub mod session_repo;
pub mod user_repo;
pub mod version_repo;

pub use catalog_repo::{RecommendationRepo, SymptomRepo};
pub use feedback_repo::FeedbackRepo;
pub use lock_repo::LockRepo;
pub use medical_history_repo::MedicalHistoryRepo;
pub use prediction_repo::PredictionRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
pub use version_repo::VersionRepo;
