//! Database operations for the storefront `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `category` - Product categories
//! - `product` - Catalog records, including the optional photo payload
//! - `app_user` - Registered shoppers (Argon2id password hashes)
//! - `user_token` - SHA-256 hashes of issued login tokens with expiry
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p emporium-cli -- migrate
//! ```
//!
//! Catalog data can be loaded with `emporium-cli seed <file>` (see [`seed`]).

pub mod catalog;
pub mod seed;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use catalog::PgCatalog;
pub use users::PgUserStore;

/// Errors returned by the catalog and user stores.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A search pattern the store could not compile.
    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Short machine-readable label for the error class.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Database(_) => "database",
            Self::InvalidPattern(_) => "invalid_pattern",
            Self::DataCorruption(_) => "data_corruption",
            Self::Conflict(_) => "conflict",
        }
    }

    /// Message safe to show a client.
    ///
    /// Query errors reported by the server (a bad regular expression, for
    /// instance) are passed through. Connection and pool failures are not.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(sqlx::Error::Database(db_err)) => db_err.message().to_owned(),
            Self::Database(_) => "datastore unavailable".to_owned(),
            Self::InvalidPattern(reason) => reason.clone(),
            Self::DataCorruption(_) => "stored data is invalid".to_owned(),
            Self::Conflict(what) => what.clone(),
        }
    }
}

/// Map a unique violation to `Conflict`, everything else to `Database`.
pub(crate) fn conflict_or_database(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(what.to_owned());
    }
    RepositoryError::Database(err)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
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
