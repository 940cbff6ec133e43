use std::sync::Arc;

use lungrisk_core::types::DbId;
use lungrisk_db::coordinator::TransactionCoordinator;
use lungrisk_db::submission::SubmissionContext;

use crate::config::ServerConfig;

/// Handler state. Clones share the pool, the config, and the coordinator.
#[derive(Clone)]
pub struct AppState {
    pub pool: lungrisk_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Serializes prediction writes.
    pub coordinator: TransactionCoordinator,
}

impl AppState {
    pub fn new(pool: lungrisk_db::DbPool, config: ServerConfig) -> Self {
        let coordinator = TransactionCoordinator::new(pool.clone(), config.locks.lease());
        Self {
            pool,
            config: Arc::new(config),
            coordinator,
        }
    }

    /// Request-scoped context for a write by `user_id`.
    pub fn submission_context(&self, user_id: DbId) -> SubmissionContext {
        SubmissionContext::new(user_id, self.config.locks.scope)
    }
}
