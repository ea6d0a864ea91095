use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::Config;

pub mod query;
pub mod transaction;

const CREATE_TABLES_SQL: &str = include_str!("../../migrations/create_tables.sql");

/// Initialize the Postgres connection pool and create tables
pub async fn init_db(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Create the users, wallets and transactions tables if they are missing
pub(crate) async fn create_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(CREATE_TABLES_SQL).execute(pool).await?;
    info!("Schema is up to date");
    Ok(())
}
