//! Authentication service.
//!
//! Provides password registration and login, and resolves the opaque
//! bearer tokens handed out at login.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use emporium_core::{Email, LoginRequest, RegisterRequest};

use crate::accounts::UserStore;
use crate::db::RepositoryError;
use crate::models::{NewUser, User};

/// Random bytes per issued token.
const TOKEN_BYTES: usize = 32;

/// Authentication service.
///
/// Handles user registration, login, and token lookup.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
    token_ttl: Duration,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore, token_ttl: Duration) -> Self {
        Self { users, token_ttl }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for the first empty required field.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::AlreadyRegistered` if the email is already registered.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let required = [
            ("Name", &request.name),
            ("Email", &request.email),
            ("Password", &request.password),
            ("Phone no", &request.phone),
            ("Address", &request.address),
            ("DOB", &request.dob),
            ("Answer", &request.answer),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(AuthError::MissingField(*field));
        }

        let email = Email::parse(&request.email)?;

        if self.users.find_by_email(email.as_str()).await?.is_some() {
            return Err(AuthError::AlreadyRegistered);
        }

        let new_user = NewUser {
            name: request.name,
            email: email.into_inner(),
            phone: request.phone,
            address: request.address,
            dob: request.dob,
            password_hash: hash_password(&request.password)?,
            answer_hash: hash_password(&request.answer)?,
        };

        self.users.create(new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::AlreadyRegistered,
            other => AuthError::Repository(other),
        })
    }

    /// Login with email and password.
    ///
    /// Returns the user and a freshly issued bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is empty.
    /// Returns `AuthError::EmailNotRegistered` if no account uses the email.
    /// Returns `AuthError::InvalidPassword` if the password is wrong.
    pub async fn login(&self, request: LoginRequest) -> Result<(User, String), AuthError> {
        if request.email.is_empty() || request.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthError::EmailNotRegistered)?;

        verify_password(&request.password, &user.password_hash)?;

        let token = generate_token();
        self.users
            .store_token(&user.id, &hash_token(&token), Utc::now() + self.token_ttl)
            .await?;

        Ok((user, token))
    }

    /// Resolve a bearer token to its user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is unknown or expired.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        self.users
            .find_by_token(&hash_token(token), Utc::now())
            .await?
            .ok_or(AuthError::InvalidToken)
    }
}

/// Generate an opaque URL-safe token.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 hex digest of a token, the form tokens are stored in.
fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidPassword)
}
