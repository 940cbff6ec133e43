//! Advisory lock rows from `lock_management`.

use lungrisk_core::concurrency::ResourceRef;
use lungrisk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `lock_management` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LockRecord {
    pub table_name: String,
    pub record_id: DbId,
    pub lock_type: String,
    pub lock_holder: DbId,
    /// Identifies one acquisition; never serialized to clients.
    #[serde(skip)]
    pub lock_token: Uuid,
    /// Expiry of the lease (`expires_at`).
    pub lock_timeout: Timestamp,
    pub acquired_at: Timestamp,
}

impl LockRecord {
    pub fn resource(&self) -> ResourceRef {
        ResourceRef::new(self.table_name.clone(), self.record_id)
    }

    /// Whether the lease has run out at `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.lock_timeout <= now
    }

    pub fn token(&self) -> LockToken {
        LockToken {
            resource: self.resource(),
            holder: self.lock_holder,
            token: self.lock_token,
            expires_at: self.lock_timeout,
        }
    }
}

/// Proof of one successful acquisition, required to release precisely that
/// acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockToken {
    pub resource: ResourceRef,
    pub holder: DbId,
    pub token: Uuid,
    pub expires_at: Timestamp,
}
