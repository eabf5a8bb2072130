//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use emporium_core::{Role, UserId, UserProfile};

/// A registered shopper, including credential hashes.
///
/// Never serialized directly; [`User::profile`] is the public view.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    pub name: String,
    /// Email exactly as registered.
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Date of birth as entered at registration.
    pub dob: String,
    pub role: Role,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Argon2id PHC string of the recovery answer.
    pub answer_hash: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            role: self.role,
        }
    }
}

/// Fields needed to create a user. Hashes are computed by the auth service.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub dob: String,
    pub password_hash: String,
    pub answer_hash: String,
}
