//! Database models - SQLx-compatible structs for PostgreSQL tables

mod ctf;

pub use ctf::{CtfModel, CtfPageRow};
