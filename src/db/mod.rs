// src/db/mod.rs

use sqlx::{Pool, Postgres};
use tracing::Level;

use crate::{config::Config, logging};

pub async fn connect(config: &Config) -> anyhow::Result<Pool<Postgres>> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    logging::log(Level::INFO, &["db"], format!("connected to PostgreSQL (pool size {})", config.max_connections));

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        logging::log(Level::INFO, &["db", "migrate"], "schema up to date");
    }
    Ok(pool)
}
