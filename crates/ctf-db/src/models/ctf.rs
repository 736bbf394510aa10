//! CTF database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the ctfs table
#[derive(Debug, Clone, FromRow)]
pub struct CtfModel {
    pub id: i64,
    pub name: String,
    pub start: DateTime<Utc>,
    /// Platform role snowflake, stored as text
    pub role_id: String,
    pub can_join: bool,
    pub ctftime_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A CTF row plus the window count of the listing query it came from
#[derive(Debug, Clone, FromRow)]
pub struct CtfPageRow {
    #[sqlx(flatten)]
    pub ctf: CtfModel,
    pub total: i64,
}
