//! Integration tests for medical history, feedback, and the reference
//! catalogues.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Medical history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn medical_history_is_404_before_first_save(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::register_token(app.clone(), "Ada").await;

    let response = get_auth(app, "/api/v1/medical-history", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn medical_history_put_replaces_record(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, user_id) = common::register_token(app.clone(), "Ada").await;

    let first = json!({
        "family_history_of_cancer": true,
        "years_smoking": 12,
        "packs_per_day": 1.5,
        "previous_lung_diseases": "Asthma",
        "occupational_exposure": true,
        "occupational_details": "Asbestos removal",
    });
    let response = put_json_auth(app.clone(), "/api/v1/medical-history", first, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await;
    assert_eq!(saved["data"]["user_id"], user_id);
    assert_eq!(saved["data"]["years_smoking"], 12);

    let second = json!({ "family_history_of_cancer": false, "years_smoking": 0 });
    let response = put_json_auth(app.clone(), "/api/v1/medical-history", second, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, "/api/v1/medical-history", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], saved["data"]["id"]);
    assert_eq!(json["data"]["family_history_of_cancer"], false);
    assert_eq!(json["data"]["years_smoking"], 0);
    assert!(json["data"]["previous_lung_diseases"].is_null());
    assert!(json["data"]["occupational_details"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn medical_history_rejects_out_of_range_values(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::register_token(app.clone(), "Ada").await;

    let body = json!({ "years_smoking": -3 });
    let response = put_json_auth(app.clone(), "/api/v1/medical-history", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "packs_per_day": 99.0 });
    let response = put_json_auth(app, "/api/v1/medical-history", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn feedback_about_own_prediction(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::register_token(app.clone(), "Ada").await;

    let prediction = json!({
        "age": 65,
        "gender": "Male",
        "smoking": "yes",
        "cough": "yes",
        "chest_pain": "yes",
        "fatigue": "yes",
        "shortness_of_breath": "yes",
    });
    let response = post_json_auth(app.clone(), "/api/v1/predictions", prediction, &token).await;
    let prediction_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let body = json!({
        "prediction_id": prediction_id,
        "feedback_text": "Clear result, thanks",
        "rating": 5,
    });
    let response = post_json_auth(app.clone(), "/api/v1/feedback", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["prediction"], "High risk of lung cancer");

    let body = json!({ "feedback_text": "General comment", "rating": 3 });
    let response = post_json_auth(app.clone(), "/api/v1/feedback", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(app, "/api/v1/feedback", &token).await;
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["feedback_text"], "General comment");
    assert!(items[0]["prediction"].is_null());
    assert_eq!(items[1]["prediction_id"], prediction_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feedback_about_someone_elses_prediction_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (ada, _) = common::register_token(app.clone(), "Ada").await;
    let (grace, _) = common::register_token(app.clone(), "Grace").await;

    let prediction = json!({
        "age": 30,
        "gender": "Female",
        "smoking": "no",
        "cough": "no",
        "chest_pain": "no",
        "fatigue": "no",
        "shortness_of_breath": "no",
    });
    let response = post_json_auth(app.clone(), "/api/v1/predictions", prediction, &ada).await;
    let prediction_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let body = json!({
        "prediction_id": prediction_id,
        "feedback_text": "Not mine",
        "rating": 2,
    });
    let response = post_json_auth(app, "/api/v1/feedback", body, &grace).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feedback_rejects_bad_rating_and_empty_text(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::register_token(app.clone(), "Ada").await;

    let body = json!({ "feedback_text": "Fine", "rating": 6 });
    let response = post_json_auth(app.clone(), "/api/v1/feedback", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "feedback_text": "   ", "rating": 4 });
    let response = post_json_auth(app, "/api/v1/feedback", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Catalogues
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn symptoms_are_listed_by_name(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::register_token(app.clone(), "Ada").await;

    let response = get_auth(app, "/api/v1/symptoms", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 6);
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn recommendations_filter_by_category(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::register_token(app.clone(), "Ada").await;

    let response = get_auth(app.clone(), "/api/v1/recommendations", &token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 5);

    let response =
        get_auth(app.clone(), "/api/v1/recommendations?risk_category=High", &token).await;
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|r| r["risk_category"] == "High"));

    let response = get_auth(app, "/api/v1/recommendations?risk_category=Severe", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn catalogues_require_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/symptoms").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
