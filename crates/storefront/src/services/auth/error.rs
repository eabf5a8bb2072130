//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required registration field was empty.
    #[error("{0} is Required")]
    MissingField(&'static str),

    /// Login was attempted without an email or password.
    #[error("Invalid email or password")]
    MissingCredentials,

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] emporium_core::EmailError),

    /// An account already uses this email.
    #[error("Already registered, please login")]
    AlreadyRegistered,

    /// No account uses this email.
    #[error("Email is not registered")]
    EmailNotRegistered,

    /// The password did not match.
    #[error("Invalid password")]
    InvalidPassword,

    /// Missing, unknown or expired bearer token.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
