//! Account storage abstraction.
//!
//! Like the catalog, accounts sit behind a trait object so the auth routes
//! run unchanged against [`crate::db::PgUserStore`] or [`MemoryUserStore`].

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use emporium_core::UserId;

use crate::db::RepositoryError;
use crate::models::{NewUser, User};

pub use memory::MemoryUserStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by email, compared exactly.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Create a user.
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Record an issued token by its hash.
    async fn store_token(
        &self,
        user_id: &UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// The owner of a token hash, provided it has not expired at `now`.
    async fn find_by_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, RepositoryError>;
}
