//! Transaction coordinator: lock, version-check, write, bump, release, commit.
//!
//! [`TransactionCoordinator::run`] drives one coordinated write through the
//! phases in [`WritePhase`]. The advisory lock is taken on the pool in its
//! own statement (so competing acquirers see it immediately) before the
//! transaction opens; on success it is deleted inside the transaction and
//! disappears atomically with the commit. Every failure path rolls back first and then
//! releases the lock by token, and a [`LockGuard`] covers the case where the
//! whole future is dropped mid-flight (request timeout, client disconnect).

use chrono::Duration;
use futures::future::BoxFuture;
use lungrisk_core::concurrency::{ResourceRef, WritePhase, INITIAL_VERSION};
use lungrisk_core::error::CoreError;
use lungrisk_core::types::{DbId, Timestamp, Version};
use sqlx::{PgConnection, PgPool};

use crate::models::lock::LockToken;
use crate::repositories::{LockRepo, VersionRepo};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a coordinated write did not commit.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Another acquirer holds a live lock on the resource.
    #[error("Lock denied on {resource}")]
    LockDenied {
        resource: ResourceRef,
        holder: Option<DbId>,
        expires_at: Option<Timestamp>,
    },

    /// The lease ran out and another acquirer reclaimed the lock before
    /// this write could commit.
    #[error("Lock on {resource} was lost before commit")]
    LockLost { resource: ResourceRef },

    /// The version ledger no longer matches what the caller read.
    #[error("Version conflict on {resource}: expected {expected:?}, found {actual:?}")]
    VersionConflict {
        resource: ResourceRef,
        expected: Option<Version>,
        actual: Option<Version>,
    },

    #[error("Storage failure: {0}")]
    Storage(#[from] sqlx::Error),

    /// Domain error raised by the unit of work.
    #[error(transparent)]
    Aborted(#[from] CoreError),
}

impl TransactionError {
    /// Stable reason code used in logs.
    pub fn reason(&self) -> &'static str {
        match self {
            TransactionError::LockDenied { .. } | TransactionError::LockLost { .. } => {
                "LOCK_DENIED"
            }
            TransactionError::VersionConflict { .. } => "VERSION_CONFLICT",
            TransactionError::Storage(_) => "STORAGE_FAILURE",
            TransactionError::Aborted(_) => "ABORTED",
        }
    }
}

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

/// What a coordinated write contends on and who is writing.
#[derive(Debug, Clone)]
pub struct WriteIntent {
    pub resource: ResourceRef,
    pub actor_id: DbId,
    /// Version the caller last read. `None` means "whatever is current".
    pub expected_version: Option<Version>,
}

/// Handed to the unit of work: the version number it must record.
#[derive(Debug, Clone)]
pub struct WriteSlot {
    pub resource: ResourceRef,
    pub version: Version,
}

/// Value produced by a committed unit of work and the ledger version it
/// committed at.
#[derive(Debug, Clone)]
pub struct Committed<T> {
    pub value: T,
    pub version: Version,
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Serializes writes to a resource with an advisory lock plus the version
/// ledger.
#[derive(Debug, Clone)]
pub struct TransactionCoordinator {
    pool: PgPool,
    lease: Duration,
}

impl TransactionCoordinator {
    pub fn new(pool: PgPool, lease: Duration) -> Self {
        Self { pool, lease }
    }

    /// Run `work` under the lock for `intent.resource`.
    ///
    /// The lock is taken before the transaction opens, so a denied call
    /// touches no data and opens no transaction; once the transaction is
    /// open exactly one commit or one rollback happens. The lock never
    /// outlives the call on any exit path except process death, where its
    /// lease bounds it.
    pub async fn run<T, F>(
        &self,
        intent: WriteIntent,
        work: F,
    ) -> Result<Committed<T>, TransactionError>
    where
        T: Send,
        F: for<'t> FnOnce(&'t mut PgConnection, WriteSlot) -> BoxFuture<'t, Result<T, TransactionError>>
            + Send,
    {
        let mut phase = PhaseLog::new(&intent.resource);

        let acquired =
            LockRepo::acquire(&self.pool, &intent.resource, intent.actor_id, self.lease).await;
        let lock = match acquired {
            Ok(Some(lock)) => lock,
            Ok(None) => {
                let live = LockRepo::find_live(&self.pool, &intent.resource)
                    .await
                    .ok()
                    .flatten();
                let err = TransactionError::LockDenied {
                    resource: intent.resource.clone(),
                    holder: live.as_ref().map(|l| l.lock_holder),
                    expires_at: live.as_ref().map(|l| l.lock_timeout),
                };
                phase.fail(&err);
                return Err(err);
            }
            Err(e) => {
                let err = TransactionError::from(e);
                phase.fail(&err);
                return Err(err);
            }
        };
        phase.advance(WritePhase::LockAcquired);

        let mut guard = LockGuard::new(self.pool.clone(), lock.token());

        let mut tx = match self.pool.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                let err = TransactionError::from(e);
                phase.fail(&err);
                guard.release().await;
                return Err(err);
            }
        };

        let outcome = execute(&mut *tx, &intent, guard.token(), &mut phase, work).await;
        let (value, version) = match outcome {
            Ok(done) => done,
            Err(err) => {
                phase.fail(&err);
                rollback(tx, &intent.resource).await;
                guard.release().await;
                return Err(err);
            }
        };

        if let Err(e) = tx.commit().await {
            let err = TransactionError::from(e);
            phase.fail(&err);
            guard.release().await;
            return Err(err);
        }
        guard.disarm();
        phase.advance(WritePhase::Committed);

        Ok(Committed { value, version })
    }
}

/// The in-transaction part of [`TransactionCoordinator::run`]: optimistic
/// check, unit of work, ledger bump, and in-transaction lock release.
async fn execute<T, F>(
    conn: &mut PgConnection,
    intent: &WriteIntent,
    token: &LockToken,
    phase: &mut PhaseLog<'_>,
    work: F,
) -> Result<(T, Version), TransactionError>
where
    F: for<'t> FnOnce(&'t mut PgConnection, WriteSlot) -> BoxFuture<'t, Result<T, TransactionError>>,
{
    let resource = &intent.resource;

    let observed = VersionRepo::current(&mut *conn, resource).await?;
    if let Some(expected) = intent.expected_version {
        if observed != Some(expected) {
            return Err(TransactionError::VersionConflict {
                resource: resource.clone(),
                expected: Some(expected),
                actual: observed,
            });
        }
    }
    let baseline = intent.expected_version.or(observed);
    let planned = baseline.map_or(INITIAL_VERSION, |v| v + 1);

    let slot = WriteSlot {
        resource: resource.clone(),
        version: planned,
    };
    let value = work(&mut *conn, slot).await?;
    phase.advance(WritePhase::Written);

    let bumped = VersionRepo::bump(&mut *conn, resource, intent.actor_id).await?;
    if bumped != planned {
        return Err(TransactionError::VersionConflict {
            resource: resource.clone(),
            expected: baseline,
            actual: Some(bumped),
        });
    }
    phase.advance(WritePhase::Versioned);

    if !LockRepo::release_token(&mut *conn, token).await? {
        return Err(TransactionError::LockLost {
            resource: resource.clone(),
        });
    }
    phase.advance(WritePhase::LockReleased);

    Ok((value, planned))
}

async fn rollback(tx: sqlx::Transaction<'static, sqlx::Postgres>, resource: &ResourceRef) {
    if let Err(e) = tx.rollback().await {
        tracing::error!(%resource, error = %e, "Rollback failed");
    }
}

// ---------------------------------------------------------------------------
// Phase tracking
// ---------------------------------------------------------------------------

struct PhaseLog<'a> {
    resource: &'a ResourceRef,
    phase: WritePhase,
}

impl<'a> PhaseLog<'a> {
    fn new(resource: &'a ResourceRef) -> Self {
        tracing::debug!(%resource, phase = %WritePhase::Started, "Coordinated write started");
        Self {
            resource,
            phase: WritePhase::Started,
        }
    }

    fn advance(&mut self, next: WritePhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal write phase transition {} -> {}",
            self.phase,
            next
        );
        tracing::debug!(
            resource = %self.resource,
            from = %self.phase,
            to = %next,
            "Write phase transition",
        );
        self.phase = next;
    }

    fn fail(&mut self, err: &TransactionError) {
        match err {
            TransactionError::Storage(_) => tracing::error!(
                resource = %self.resource,
                phase = %self.phase,
                reason = err.reason(),
                error = %err,
                "Coordinated write rolled back",
            ),
            _ => tracing::warn!(
                resource = %self.resource,
                phase = %self.phase,
                reason = err.reason(),
                error = %err,
                "Coordinated write rolled back",
            ),
        }
        self.advance(WritePhase::RolledBack);
    }
}

// ---------------------------------------------------------------------------
// Lock guard
// ---------------------------------------------------------------------------

/// Releases an acquired lock unless disarmed after a successful commit.
///
/// Explicit [`LockGuard::release`] is used on ordinary failure paths. If the
/// owning future is dropped instead, `Drop` hands the release to the runtime.
struct LockGuard {
    pool: PgPool,
    token: LockToken,
    armed: bool,
}

impl LockGuard {
    fn new(pool: PgPool, token: LockToken) -> Self {
        Self {
            pool,
            token,
            armed: true,
        }
    }

    fn token(&self) -> &LockToken {
        &self.token
    }

    fn disarm(&mut self) {
        self.armed = false;
    }

    async fn release(&mut self) {
        if std::mem::take(&mut self.armed) {
            release_logged(&self.pool, &self.token).await;
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let pool = self.pool.clone();
                let token = self.token.clone();
                handle.spawn(async move {
                    release_logged(&pool, &token).await;
                });
            }
            Err(_) => tracing::warn!(
                resource = %self.token.resource,
                expires_at = %self.token.expires_at,
                "No runtime to release abandoned lock; it will expire with its lease",
            ),
        }
    }
}

async fn release_logged(pool: &PgPool, token: &LockToken) {
    match LockRepo::release_token(pool, token).await {
        Ok(true) => tracing::debug!(resource = %token.resource, "Lock released after rollback"),
        Ok(false) => tracing::debug!(resource = %token.resource, "Lock already gone"),
        Err(e) => tracing::error!(
            resource = %token.resource,
            error = %e,
            "Failed to release lock; it will expire with its lease",
        ),
    }
}
