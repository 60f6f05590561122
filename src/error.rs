// src/error.rs

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::Level;

use crate::{
    dates::{DateParseError, DayCountError},
    logging,
    response::Envelope,
};

/// Field name → message, as sent back in `details`.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error(transparent)]
    Date(#[from] DateParseError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) | ApiError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) | ApiError::Date(_) | ApiError::Database(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<DayCountError> for ApiError {
    fn from(err: DayCountError) -> Self {
        match err {
            DayCountError::Parse(e) => ApiError::Date(e),
            DayCountError::OffsetOutOfRange(_) => {
                ApiError::Validation(FieldErrors::from([("offset".to_owned(), "is out of range".to_owned())]))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let envelope = match self {
            ApiError::Validation(fields) => {
                let details = fields.into_iter().map(|(k, v)| (k, Value::String(v))).collect();
                Envelope::failure("validation failed", Some(Value::Object(details)))
            }
            ApiError::Database(sqlx::Error::RowNotFound) => Envelope::failure("resource not found", None),
            ApiError::Database(e) => {
                logging::log(Level::ERROR, &["db"], e.to_string());
                Envelope::failure("database error", None)
            }
            other => Envelope::failure(other.to_string(), None),
        };
        (status, Json(envelope)).into_response()
    }
}
