// src/main.rs

use std::sync::Arc;

use sqlx::{Pool, Postgres};
use tokio::net::TcpListener;
use tracing::Level;

mod config;
mod dates;
mod db;
mod error;
mod logging;
mod middleware;
mod models;
mod normalizer;
mod response;
mod routes;
mod validation;

use normalizer::AliasTable;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<Postgres>,
    /// internal → external, for responses
    pub aliases: Arc<AliasTable>,
    /// external → internal, for request bodies
    pub inbound: Arc<AliasTable>,
}

impl AppState {
    pub fn new(pool: Pool<Postgres>, aliases: AliasTable) -> Self {
        let inbound = Arc::new(aliases.inverse());
        Self { pool, aliases: Arc::new(aliases), inbound }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();
    logging::init();

    let config = config::Config::from_env()?;
    let aliases = AliasTable::arrets()?;
    let cors = middleware::cors_layer(&config.cors_origins)?;

    let pool = db::connect(&config).await?;
    let app = routes::router(AppState::new(pool, aliases), cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    logging::log(Level::INFO, &["server"], format!("API listening on http://{addr}"));

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
