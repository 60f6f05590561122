// src/response.rs

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::Value;

/// Body shape shared by every `/api` endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None, details: None }
    }
}

impl Envelope<Value> {
    pub fn failure(error: impl Into<String>, details: Option<Value>) -> Self {
        Self { success: false, data: None, error: Some(error.into()), details }
    }
}

/// 200 + `{ "success": true, "data": ... }`.
pub struct ApiOk<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for ApiOk<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(Envelope::ok(self.0))).into_response()
    }
}
