//! # webvault-db
//!
//! PostgreSQL database layer for WebVault.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for all core entities
//! - The canonical website filter-composition and listing query
//! - All-or-nothing bulk review
//!
//! ## Example
//!
//! ```rust,ignore
//! use webvault_db::Database;
//! use webvault_core::{PageParams, WebsiteFilters};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/webvault").await?;
//!
//!     let listing = db
//!         .websites
//!         .list(WebsiteFilters::default(), PageParams::default())
//!         .await?;
//!
//!     println!("{} of {} websites", listing.websites.len(), listing.total);
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod blog;
pub mod categories;
pub mod collections;
pub mod pool;
pub mod sessions;
pub mod submissions;
pub mod tags;
pub mod websites;

#[cfg(test)]
mod tests;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use webvault_core::*;

// Re-export repository implementations
pub use audit::PgAuditLogRepository;
pub use blog::PgBlogRepository;
pub use categories::PgCategoryRepository;
pub use collections::PgCollectionRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use sessions::PgSessionRepository;
pub use submissions::PgSubmissionRepository;
pub use tags::PgTagRepository;
pub use websites::{compose_filters, FilterParam, PgWebsiteRepository};

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Website repository: listing, visits, status transitions, bulk review.
    pub websites: PgWebsiteRepository,
    /// Tag repository.
    pub tags: PgTagRepository,
    /// Category repository.
    pub categories: PgCategoryRepository,
    /// Collection repository.
    pub collections: PgCollectionRepository,
    /// Blog post repository.
    pub blog: PgBlogRepository,
    /// Submission request repository.
    pub submissions: PgSubmissionRepository,
    /// Append-only audit trail.
    pub audit: PgAuditLogRepository,
    /// Session revocation for sign-out.
    pub sessions: PgSessionRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            websites: PgWebsiteRepository::new(pool.clone()),
            tags: PgTagRepository::new(pool.clone()),
            categories: PgCategoryRepository::new(pool.clone()),
            collections: PgCollectionRepository::new(pool.clone()),
            blog: PgBlogRepository::new(pool.clone()),
            submissions: PgSubmissionRepository::new(pool.clone()),
            audit: PgAuditLogRepository::new(pool.clone()),
            sessions: PgSessionRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect with default pool configuration.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Connect with custom pool configuration.
    pub async fn connect_with_config(database_url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(database_url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run embedded schema migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Internal(format!("migration failed: {}", e)))?;
        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

#[cfg(test)]
mod escape_tests {
    use super::escape_like;

    #[test]
    fn test_escape_like_handles_all_wildcards() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_escape_like_escapes_backslash_first() {
        // "\%" must become "\\\%", not "\\\\%"
        assert_eq!(escape_like("\\%"), "\\\\\\%");
    }

    #[test]
    fn test_escape_like_leaves_plain_text_alone() {
        assert_eq!(escape_like("rust docs"), "rust docs");
    }
}
