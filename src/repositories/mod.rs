use async_trait::async_trait;

mod memory;
mod postgres;

pub use memory::InMemoryMappingRepository;
pub use postgres::PgMappingRepository;

use crate::errors::RepositoryError;
use crate::models::UrlMapping;

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Key-value contract every mapping store fulfils.
///
/// # Implementations
///
/// - [`PgMappingRepository`] - Postgres, one row per mapping
/// - [`InMemoryMappingRepository`] - process-local, for development and tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Inserts a new mapping keyed by its short id
    ///
    /// ### Errors
    /// * `RepositoryError::Conflict` - If the short id is already taken
    /// * `RepositoryError::Database` - If the store is unreachable or rejects the write
    async fn put(&self, mapping: &UrlMapping) -> Result<()>;

    /// Looks up the original URL for a short id by exact match
    ///
    /// ### Returns
    /// * `Result<Option<String>>` - The first matching original URL, or `None`
    ///
    /// ### Errors
    /// * `RepositoryError::Database` - If the query fails
    async fn find_by_short_id(&self, short_url: &str) -> Result<Option<String>>;

    /// Short name of the backend, reported by the health endpoint
    fn backend_name(&self) -> &'static str;
}
