//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{Ctf, CtfFilter, CtfUpdate};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// CTF Repository
// ============================================================================

/// Durable store of CTF records
///
/// Every method runs in its own transaction: it either fully applies or leaves
/// the store untouched.
#[async_trait]
pub trait CtfRepository: Send + Sync {
    /// Find a CTF by its unique name, `CtfNotFound` if absent
    async fn find_by_name(&self, name: &str) -> RepoResult<Ctf>;

    /// List CTFs matching `filter`, ordered by id, with the total match count
    /// ignoring limit and offset
    async fn find(&self, filter: &CtfFilter) -> RepoResult<(Vec<Ctf>, u64)>;

    /// Insert a new CTF, stamping timestamps and back-filling `id`
    async fn create(&self, ctf: &mut Ctf) -> RepoResult<()>;

    /// Apply a partial update to the CTF called `name`
    async fn update(&self, name: &str, update: &CtfUpdate) -> RepoResult<Ctf>;

    /// Permanently delete the CTF called `name`
    async fn delete(&self, name: &str) -> RepoResult<()>;
}
