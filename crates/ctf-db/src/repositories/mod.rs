//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in ctf-core.

mod ctf;
mod error;

pub use ctf::PgCtfRepository;
