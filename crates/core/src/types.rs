//! Primitive aliases shared by every crate in the workspace.

/// Primary keys are Postgres `BIGSERIAL`.
pub type DbId = i64;

/// Stored as `TIMESTAMPTZ`, always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A `version_control.version_number`; starts at 1 and grows by one per
/// committed write.
pub type Version = i32;
