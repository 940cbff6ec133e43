//! Periodic purge of expired advisory locks.
//!
//! Acquisition already reclaims expired locks lazily, so this job only keeps
//! `lock_management` from accumulating rows left by crashed writers.

use std::time::Duration;

use lungrisk_db::repositories::LockRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Run the sweep loop every `interval` until `cancel` is triggered.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Lock sweeper started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Lock sweeper stopping");
                break;
            }
            _ = ticker.tick() => {
                match LockRepo::sweep_expired(&pool).await {
                    Ok(0) => tracing::debug!("Lock sweep: nothing expired"),
                    Ok(deleted) => tracing::info!(deleted, "Lock sweep: purged expired locks"),
                    Err(e) => tracing::error!(error = %e, "Lock sweep failed"),
                }
            }
        }
    }
}
