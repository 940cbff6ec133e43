//! Resource keys, lock constants, and the submission phase model shared by
//! the lock table, the version ledger, and the transaction coordinator.
//!
//! A *resource* is the `(table_name, record_id)` pair a lock or version
//! record protects. Which `record_id` a prediction submission contends on is
//! decided by [`LockScope`], never implicitly by the acting user.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::types::{DbId, Version};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Table name used as the resource namespace for prediction writes.
pub const PREDICTIONS_TABLE: &str = "predictions";

/// `record_id` used for the single shared slot under [`LockScope::Global`].
pub const GLOBAL_RECORD_ID: DbId = 0;

/// Default lock lease in seconds.
pub const DEFAULT_LOCK_LEASE_SECS: u64 = 30;

/// Lease bounds accepted from configuration.
pub const MIN_LOCK_LEASE_SECS: u64 = 1;
pub const MAX_LOCK_LEASE_SECS: u64 = 3600;

/// Version number of a resource's first successful write.
pub const INITIAL_VERSION: Version = 1;

/// Known lock types.
pub mod lock_types {
    /// Only one acquirer can hold the lock at a time.
    pub const EXCLUSIVE: &str = "exclusive";
}

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

/// Identity of a lockable / versioned resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceRef {
    pub table_name: String,
    pub record_id: DbId,
}

impl ResourceRef {
    pub fn new(table_name: impl Into<String>, record_id: DbId) -> Self {
        Self {
            table_name: table_name.into(),
            record_id,
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.table_name, self.record_id)
    }
}

// ---------------------------------------------------------------------------
// Lock scope
// ---------------------------------------------------------------------------

/// Which submissions contend for the same prediction lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockScope {
    /// One slot per submitting user: a user's concurrent submissions are
    /// serialized, different users never contend.
    #[default]
    Submitter,
    /// One slot for the whole table: only one prediction may be written at a
    /// time across all users.
    Global,
}

impl LockScope {
    /// Resolve the resource a submission by `actor_id` must lock.
    pub fn prediction_resource(self, actor_id: DbId) -> ResourceRef {
        let record_id = match self {
            LockScope::Submitter => actor_id,
            LockScope::Global => GLOBAL_RECORD_ID,
        };
        ResourceRef::new(PREDICTIONS_TABLE, record_id)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LockScope::Submitter => "submitter",
            LockScope::Global => "global",
        }
    }
}

impl FromStr for LockScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "submitter" | "user" => Ok(LockScope::Submitter),
            "global" => Ok(LockScope::Global),
            other => Err(format!(
                "Invalid lock scope '{other}'. Must be one of: submitter, global"
            )),
        }
    }
}

/// Validate a lock lease in seconds.
pub fn validate_lease_secs(secs: u64) -> Result<(), String> {
    if secs < MIN_LOCK_LEASE_SECS {
        return Err(format!(
            "Lock lease must be at least {MIN_LOCK_LEASE_SECS} second(s), got {secs}"
        ));
    }
    if secs > MAX_LOCK_LEASE_SECS {
        return Err(format!(
            "Lock lease must be at most {MAX_LOCK_LEASE_SECS} seconds, got {secs}"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Submission phases
// ---------------------------------------------------------------------------

/// Phases of one coordinated write. Any phase may move to `RolledBack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    Started,
    LockAcquired,
    Written,
    Versioned,
    LockReleased,
    Committed,
    RolledBack,
}

impl WritePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            WritePhase::Started => "started",
            WritePhase::LockAcquired => "lock_acquired",
            WritePhase::Written => "written",
            WritePhase::Versioned => "versioned",
            WritePhase::LockReleased => "lock_released",
            WritePhase::Committed => "committed",
            WritePhase::RolledBack => "rolled_back",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, WritePhase::Committed | WritePhase::RolledBack)
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_advance_to(self, next: WritePhase) -> bool {
        use WritePhase::*;
        match (self, next) {
            (from, RolledBack) => !from.is_terminal(),
            (Started, LockAcquired)
            | (LockAcquired, Written)
            | (Written, Versioned)
            | (Versioned, LockReleased)
            | (LockReleased, Committed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for WritePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
