use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

use crate::app::errors::ApiError;

pub async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}
