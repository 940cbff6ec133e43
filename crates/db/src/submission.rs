//! Prediction submission: validate, score, and persist under the coordinator.

use lungrisk_core::concurrency::{LockScope, ResourceRef};
use lungrisk_core::error::CoreError;
use lungrisk_core::prediction::{PredictionInput, NO, YES};
use lungrisk_core::risk;
use lungrisk_core::types::{DbId, Version};
use sqlx::PgPool;

use crate::coordinator::{Committed, TransactionCoordinator, TransactionError, WriteIntent};
use crate::models::prediction::{CreatePrediction, Prediction};
use crate::repositories::{PredictionRepo, VersionRepo};

/// Request-scoped identity of the acting user and the lock scope in force.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionContext {
    pub actor_id: DbId,
    pub lock_scope: LockScope,
}

impl SubmissionContext {
    pub fn new(actor_id: DbId, lock_scope: LockScope) -> Self {
        Self {
            actor_id,
            lock_scope,
        }
    }

    /// The resource this actor's prediction writes contend on.
    pub fn resource(&self) -> ResourceRef {
        self.lock_scope.prediction_resource(self.actor_id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// Rejected before any lock or transaction was touched.
    #[error(transparent)]
    Invalid(CoreError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

fn yes_no(flag: bool) -> String {
    if flag { YES } else { NO }.to_string()
}

/// Score `input` and store it as a prediction owned by `ctx.actor_id`.
///
/// Validation runs first; an invalid input never opens a transaction. The
/// stored row carries the ledger version it was committed at.
pub async fn submit_prediction(
    coordinator: &TransactionCoordinator,
    ctx: &SubmissionContext,
    input: &PredictionInput,
    expected_version: Option<Version>,
) -> Result<Committed<Prediction>, SubmissionError> {
    let factors = input.to_factors().map_err(SubmissionError::Invalid)?;
    let assessment = risk::assess(&factors);

    let record = CreatePrediction {
        age: i32::from(factors.age),
        gender: factors.gender.as_str().to_string(),
        smoking: yes_no(factors.smoking),
        cough: yes_no(factors.cough),
        chest_pain: yes_no(factors.chest_pain),
        fatigue: yes_no(factors.fatigue),
        shortness_of_breath: yes_no(factors.shortness_of_breath),
        prediction: assessment.category.label().to_string(),
        risk_score: f64::from(assessment.score),
        version: 0,
    };
    let owner = ctx.actor_id;
    let intent = WriteIntent {
        resource: ctx.resource(),
        actor_id: ctx.actor_id,
        expected_version,
    };

    let committed = coordinator
        .run(intent, move |conn, slot| {
            Box::pin(async move {
                let record = CreatePrediction {
                    version: slot.version,
                    ..record
                };
                let prediction = PredictionRepo::create(&mut *conn, &record).await?;
                PredictionRepo::link_owner(&mut *conn, owner, prediction.id).await?;
                Ok::<_, TransactionError>(prediction)
            })
        })
        .await?;

    tracing::info!(
        prediction_id = committed.value.id,
        user_id = owner,
        score = assessment.score,
        version = committed.version,
        "Prediction stored",
    );
    Ok(committed)
}

/// Current ledger version of the resource `ctx` writes to.
pub async fn current_version(
    pool: &PgPool,
    ctx: &SubmissionContext,
) -> Result<Option<Version>, sqlx::Error> {
    VersionRepo::current(pool, &ctx.resource()).await
}
