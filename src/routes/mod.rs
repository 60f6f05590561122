// src/routes/mod.rs

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{error::ApiError, AppState};

pub mod arrets;
pub mod calendar;
pub mod health;

/// Full application: routes, state and middleware.
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        // health
        .route("/health", get(health::health))
        // arrêts
        .route(
            "/api/arrets",
            get(arrets::list_arrets).post(arrets::create_arret),
        )
        .route(
            "/api/arrets/:id",
            get(arrets::get_arret)
                .put(arrets::update_arret)
                .patch(arrets::update_arret)
                .delete(arrets::delete_arret),
        )
        // date helpers
        .route("/api/dates/diff", post(calendar::diff))
        .route("/api/dates/interval", post(calendar::interval))
        .fallback(not_found)
        // state & middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
