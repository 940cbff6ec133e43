//! The `{ "data": ... }` success envelope.

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// 200 with `data` enveloped.
pub fn ok<T: Serialize>(data: T) -> Json<DataResponse<T>> {
    Json(DataResponse { data })
}

/// 201 with `data` enveloped.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<DataResponse<T>>) {
    (StatusCode::CREATED, ok(data))
}
