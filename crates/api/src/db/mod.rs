//! Database operations for the marketplace `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Accounts with their current [`Role`](corner_store_core::Role)
//! - `stores` - One seller storefront per user, `PENDING` until approved
//! - `products` - Listings owned by a store
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/`, embedded in [`MIGRATOR`],
//! and run via:
//! ```bash
//! cargo run -p corner-store-cli -- migrate
//! ```

pub mod products;
pub mod stores;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use products::ProductRepository;
pub use stores::StoreRepository;
pub use users::UserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation. Carries the constraint name.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Classify an error from an `INSERT`/`UPDATE`.
    ///
    /// Unique violations become [`RepositoryError::Conflict`] naming the
    /// violated constraint; everything else stays a database error.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            let constraint = db_err.constraint().unwrap_or("unknown").to_owned();
            return Self::Conflict(constraint);
        }
        Self::Database(err)
    }

    /// Whether this is a conflict on the given constraint.
    #[must_use]
    pub fn is_conflict_on(&self, constraint: &str) -> bool {
        matches!(self, Self::Conflict(name) if name == constraint)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_matching() {
        let err = RepositoryError::Conflict(users::EMAIL_UNIQUE.to_owned());
        assert!(err.is_conflict_on(users::EMAIL_UNIQUE));
        assert!(!err.is_conflict_on(stores::STORE_NAME_UNIQUE));
        assert!(!RepositoryError::NotFound.is_conflict_on(users::EMAIL_UNIQUE));
    }

    #[test]
    fn test_non_database_errors_are_not_conflicts() {
        let err = RepositoryError::from_write(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
