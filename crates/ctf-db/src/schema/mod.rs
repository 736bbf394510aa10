//! Schema bootstrap
//!
//! The schema is embedded in the binary and applied statement by statement.
//! Every statement is idempotent, so this runs on each startup.

use sqlx::PgPool;
use tracing::{info, instrument};

const CTFS: &str = include_str!("ctfs.sql");

/// Apply the schema to `pool`
#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in statements(CTFS) {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("Database schema is up to date");
    Ok(())
}

fn statements(script: &str) -> impl Iterator<Item = &str> {
    script.split(';').map(str::trim).filter(|s| !s.is_empty())
}
