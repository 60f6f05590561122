// src/middleware/json_body.rs

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// `Json<T>` whose rejections come back as a 400 envelope instead of
/// axum's plain-text bodies.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::BadRequest(describe(&rejection))),
        }
    }
}

fn describe(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => "expected a JSON body (Content-Type: application/json)".into(),
        JsonRejection::JsonSyntaxError(_) => format!("malformed JSON body: {}", rejection.body_text()),
        JsonRejection::JsonDataError(_) => format!("unexpected JSON shape: {}", rejection.body_text()),
        _ => rejection.body_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        routing::post,
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::normalizer::Record;

    async fn echo(JsonBody(record): JsonBody<Record>) -> Json<Record> {
        Json(record)
    }

    async fn send(content_type: Option<&str>, body: &'static str) -> (StatusCode, Value) {
        let mut req = Request::builder().method("POST").uri("/echo");
        if let Some(ct) = content_type {
            req = req.header(header::CONTENT_TYPE, ct);
        }
        let res = Router::new()
            .route("/echo", post(echo))
            .oneshot(req.body(Body::from(body)).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn parses_json_objects() {
        let (status, body) = send(Some("application/json"), r#"{"arret-from-line":"2024-01-01"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "arret-from-line": "2024-01-01" }));
    }

    #[tokio::test]
    async fn malformed_json_is_a_400_envelope() {
        let (status, body) = send(Some("application/json"), r#"{"arret-from-line": "#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().starts_with("malformed JSON body"));
    }

    #[tokio::test]
    async fn wrong_shape_is_a_400_envelope() {
        let (status, body) = send(Some("application/json"), "[1, 2]").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("unexpected JSON shape"));
    }

    #[tokio::test]
    async fn missing_content_type_is_a_400_envelope() {
        let (status, body) = send(None, "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("expected a JSON body (Content-Type: application/json)"));
    }
}
