//! # ctf-db
//!
//! Database layer implementing the CTF repository with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management
//! - Idempotent schema bootstrap
//! - Database model with SQLx `FromRow` derive
//! - Entity ↔ Model mapper
//! - `PgCtfRepository`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ctf_db::{create_pool, run_migrations, DatabaseConfig, PgCtfRepository};
//! use ctf_core::CtfRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::from_env()).await?;
//!     run_migrations(&pool).await?;
//!     let repo = PgCtfRepository::new(pool);
//!     let ctf = repo.find_by_name("demoCTF").await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::PgCtfRepository;
pub use schema::run_migrations;
