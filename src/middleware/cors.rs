// src/middleware/cors.rs

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::ConfigError;

const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

const ALLOWED_HEADERS: [HeaderName; 5] = [
    HeaderName::from_static("x-requested-with"),
    header::CONTENT_TYPE,
    header::ACCEPT,
    header::ORIGIN,
    header::AUTHORIZATION,
];

/// CORS headers for every response. An empty origin list allows any origin.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let values = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).map_err(|_| ConfigError::Invalid {
                    key: "CORS_ALLOWED_ORIGINS",
                    value: o.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS))
}
