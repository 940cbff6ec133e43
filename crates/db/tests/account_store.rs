//! Integration tests for users, sessions, medical history, catalogues, and
//! feedback.

use chrono::{Duration, Utc};
use lungrisk_core::concurrency::LockScope;
use lungrisk_core::prediction::PredictionInput;
use lungrisk_db::coordinator::TransactionCoordinator;
use lungrisk_db::models::feedback::CreateFeedback;
use lungrisk_db::models::medical_history::UpsertMedicalHistory;
use lungrisk_db::models::session::CreateSession;
use lungrisk_db::models::user::CreateUser;
use lungrisk_db::repositories::{
    FeedbackRepo, MedicalHistoryRepo, RecommendationRepo, SessionRepo, SymptomRepo, UserRepo,
};
use lungrisk_db::submission::{submit_prediction, SubmissionContext};
use sqlx::PgPool;

fn new_user(name: &str) -> CreateUser {
    CreateUser {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        password_hash: "hash".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Users and sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_lookup_by_email_and_id(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("Ada")).await.unwrap();

    let by_email = UserRepo::find_by_email(&pool, "ada@example.com").await.unwrap().unwrap();
    assert_eq!(by_email.id, user.id);
    let by_id = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(by_id.name, "Ada");
    assert!(UserRepo::find_by_email(&pool, "nobody@example.com").await.unwrap().is_none());
    assert!(UserRepo::email_taken(&pool, "ada@example.com").await.unwrap());
    assert!(!UserRepo::email_taken(&pool, "nobody@example.com").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_violates_unique_constraint(pool: PgPool) {
    UserRepo::create(&pool, &new_user("Ada")).await.unwrap();
    let err = UserRepo::create(&pool, &new_user("Ada")).await.unwrap_err();

    let db_err = err.as_database_error().unwrap();
    assert_eq!(db_err.constraint(), Some("uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_revocation(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("Ada")).await.unwrap();
    let session = SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "abc".to_string(),
            expires_at: Utc::now() + Duration::days(1),
        },
    )
    .await
    .unwrap();

    let found = SessionRepo::find_active(&pool, "abc").await.unwrap();
    assert_eq!(found.map(|s| s.id), Some(session.id));

    assert!(SessionRepo::revoke(&pool, session.id).await.unwrap());
    assert!(!SessionRepo::revoke(&pool, session.id).await.unwrap());
    assert!(SessionRepo::find_active(&pool, "abc").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_session_not_found(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("Ada")).await.unwrap();
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "old".to_string(),
            expires_at: Utc::now() - Duration::minutes(1),
        },
    )
    .await
    .unwrap();

    assert!(SessionRepo::find_active(&pool, "old").await.unwrap().is_none());
    assert_eq!(SessionRepo::revoke_all_for_user(&pool, user.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_rotation_is_single_use(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("Ada")).await.unwrap();
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "first".to_string(),
            expires_at: Utc::now() + Duration::days(1),
        },
    )
    .await
    .unwrap();
    let expires_at = Utc::now() + Duration::days(1);

    let rotated = SessionRepo::rotate(&pool, "first", "second", expires_at)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rotated.user_id, user.id);
    assert_eq!(rotated.refresh_token_hash, "second");
    assert!(!rotated.is_revoked);

    // The presented token is consumed.
    assert!(SessionRepo::rotate(&pool, "first", "third", expires_at)
        .await
        .unwrap()
        .is_none());
    assert!(SessionRepo::find_active(&pool, "first").await.unwrap().is_none());
    assert!(SessionRepo::find_active(&pool, "second").await.unwrap().is_some());
    assert!(SessionRepo::rotate(&pool, "unknown", "fourth", expires_at)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Medical history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_medical_history_upsert_replaces_row(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("Ada")).await.unwrap();
    assert!(MedicalHistoryRepo::find_by_user(&pool, user.id).await.unwrap().is_none());

    let first = MedicalHistoryRepo::upsert(
        &pool,
        user.id,
        &UpsertMedicalHistory {
            family_history_of_cancer: Some(true),
            years_smoking: Some(10),
            packs_per_day: Some(0.5),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let second = MedicalHistoryRepo::upsert(
        &pool,
        user.id,
        &UpsertMedicalHistory {
            years_smoking: Some(12),
            occupational_exposure: Some(true),
            occupational_details: Some("Asbestos removal".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(second.id, first.id, "one row per user");
    assert_eq!(second.years_smoking, Some(12));
    assert_eq!(second.family_history_of_cancer, None, "upsert replaces every field");
    assert_eq!(second.occupational_details.as_deref(), Some("Asbestos removal"));
}

// ---------------------------------------------------------------------------
// Catalogues
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_catalogues(pool: PgPool) {
    let symptoms = SymptomRepo::list(&pool).await.unwrap();
    assert_eq!(symptoms.len(), 6);
    let names: Vec<&str> = symptoms.iter().map(|s| s.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted, "symptoms are ordered by name");

    let all = RecommendationRepo::list(&pool, None).await.unwrap();
    assert_eq!(all.len(), 5);
    let high = RecommendationRepo::list(&pool, Some("High")).await.unwrap();
    assert_eq!(high.len(), 2);
    assert!(high.iter().all(|r| r.risk_category == "High"));
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_feedback_carries_prediction_label(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("Ada")).await.unwrap();
    let coordinator = TransactionCoordinator::new(pool.clone(), Duration::seconds(30));
    let committed = submit_prediction(
        &coordinator,
        &SubmissionContext::new(user.id, LockScope::Submitter),
        &PredictionInput {
            age: 30,
            gender: "Female".to_string(),
            smoking: "no".to_string(),
            cough: "no".to_string(),
            chest_pain: "no".to_string(),
            fatigue: "no".to_string(),
            shortness_of_breath: "no".to_string(),
        },
        None,
    )
    .await
    .unwrap();

    assert!(FeedbackRepo::user_owns_prediction(&pool, user.id, committed.value.id)
        .await
        .unwrap());

    let linked = FeedbackRepo::create(
        &pool,
        user.id,
        &CreateFeedback {
            prediction_id: Some(committed.value.id),
            feedback_text: "Clear explanation".to_string(),
            rating: 5,
        },
    )
    .await
    .unwrap();
    assert_eq!(linked.prediction.as_deref(), Some("Low risk of lung cancer"));

    FeedbackRepo::create(
        &pool,
        user.id,
        &CreateFeedback {
            prediction_id: None,
            feedback_text: "General comment".to_string(),
            rating: 3,
        },
    )
    .await
    .unwrap();

    let listed = FeedbackRepo::list_for_user(&pool, user.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].feedback_text, "General comment");
    assert_eq!(listed[0].prediction, None);
    assert_eq!(listed[1].prediction.as_deref(), Some("Low risk of lung cancer"));
}
