use crate::error::SourceError;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// This function reads `DATABASE_URL` from the environment (a `.env` file is
/// loaded first when present) and creates a small connection pool.
pub async fn connect() -> Result<PgPool, SourceError> {
    // A missing .env file is fine when the variable is already exported.
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_e| SourceError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await?;

    tracing::debug!("Connected to PostgreSQL");
    Ok(pool)
}
