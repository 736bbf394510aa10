//! PostgreSQL implementation of CtfRepository
//!
//! Each operation opens its own transaction. Dropping an uncommitted
//! transaction rolls it back, so every early `?` return leaves the table as it
//! was.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};

use ctf_core::{Ctf, CtfFilter, CtfRepository, CtfUpdate, DomainError, RepoResult};

use crate::mappers::CtfRow;
use crate::models::{CtfModel, CtfPageRow};

use super::error::{ctf_not_found, map_db_error, map_unique_violation};

const CTF_COLUMNS: &str =
    "id, name, start, role_id, can_join, ctftime_url, created_at, updated_at";

/// PostgreSQL implementation of CtfRepository
#[derive(Clone)]
pub struct PgCtfRepository {
    pool: PgPool,
}

impl PgCtfRepository {
    /// Create a new PgCtfRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a row by name, optionally locking it for the rest of the transaction
    async fn fetch_by_name(
        conn: &mut PgConnection,
        name: &str,
        for_update: bool,
    ) -> RepoResult<Option<CtfModel>> {
        let lock = if for_update { " FOR UPDATE" } else { "" };
        let sql = format!("SELECT {CTF_COLUMNS} FROM ctfs WHERE name = $1{lock}");

        sqlx::query_as::<_, CtfModel>(&sql)
            .bind(name)
            .fetch_optional(&mut *conn)
            .await
            .map_err(map_db_error)
    }
}

/// Current time at the store's precision (microseconds)
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Next `updated_at`, strictly after `previous` even if the clock did not move
fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    now().max(previous + Duration::microseconds(1))
}

#[async_trait]
impl CtfRepository for PgCtfRepository {
    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> RepoResult<Ctf> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let model = Self::fetch_by_name(&mut tx, name, false)
            .await?
            .ok_or_else(|| ctf_not_found(name))?;

        tx.commit().await.map_err(map_db_error)?;

        Ctf::try_from(model)
    }

    #[instrument(skip(self))]
    async fn find(&self, filter: &CtfFilter) -> RepoResult<(Vec<Ctf>, u64)> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {CTF_COLUMNS}, COUNT(*) OVER() AS total FROM ctfs WHERE TRUE"
        ));
        if let Some(id) = filter.id {
            query.push(" AND id = ").push_bind(id);
        }
        if let Some(name) = &filter.name {
            query.push(" AND name = ").push_bind(name.clone());
        }
        if let Some(role_id) = filter.role_id {
            query.push(" AND role_id = ").push_bind(role_id.to_string());
        }
        if let Some(can_join) = filter.can_join {
            query.push(" AND can_join = ").push_bind(can_join);
        }
        query.push(" ORDER BY id ASC");
        if filter.limit > 0 {
            query.push(" LIMIT ").push_bind(i64::from(filter.limit));
        }
        if filter.offset > 0 {
            query.push(" OFFSET ").push_bind(i64::from(filter.offset));
        }

        let rows = query
            .build_query_as::<CtfPageRow>()
            .fetch_all(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        // The window count rides on every row; an empty page carries none
        let total = rows
            .first()
            .map_or(0, |row| u64::try_from(row.total).unwrap_or(0));
        let ctfs = rows
            .into_iter()
            .map(|row| Ctf::try_from(row.ctf))
            .collect::<RepoResult<Vec<_>>>()?;

        Ok((ctfs, total))
    }

    #[instrument(skip(self, ctf), fields(ctf = %ctf.name))]
    async fn create(&self, ctf: &mut Ctf) -> RepoResult<()> {
        let now = now();
        ctf.created_at = now;
        ctf.updated_at = now;
        ctf.validate()?;

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let row = CtfRow::new(ctf);
        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO ctfs (name, start, role_id, can_join, ctftime_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(row.name)
        .bind(ctf.start)
        .bind(&row.role_id)
        .bind(row.can_join)
        .bind(row.ctftime_url)
        .bind(ctf.created_at)
        .bind(ctf.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::CtfAlreadyExists(ctf.name.clone())))?;

        tx.commit().await.map_err(map_db_error)?;

        ctf.id = id;
        info!(id, "CTF record created");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update(&self, name: &str, update: &CtfUpdate) -> RepoResult<Ctf> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let model = Self::fetch_by_name(&mut tx, name, true)
            .await?
            .ok_or_else(|| ctf_not_found(name))?;
        let mut ctf = Ctf::try_from(model)?;

        ctf.apply(update);
        ctf.updated_at = next_updated_at(ctf.updated_at);
        ctf.validate()?;

        let row = CtfRow::new(&ctf);
        sqlx::query(
            r"
            UPDATE ctfs
            SET name = $2, start = $3, role_id = $4, can_join = $5, ctftime_url = $6, updated_at = $7
            WHERE id = $1
            ",
        )
        .bind(ctf.id)
        .bind(row.name)
        .bind(ctf.start)
        .bind(&row.role_id)
        .bind(row.can_join)
        .bind(row.ctftime_url)
        .bind(ctf.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::CtfAlreadyExists(ctf.name.clone())))?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(ctf)
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM ctfs WHERE name = $1")
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(ctf_not_found(name));
        }

        tx.commit().await.map_err(map_db_error)?;

        info!("CTF record deleted");
        Ok(())
    }
}
