//! Request and response bodies for the `/api/v1/auth` endpoints.
//!
//! The server builds these; the client reads login responses as raw JSON so
//! that it can persist the body verbatim (see `emporium-client`).

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Account role. Encoded as an integer on the wire (`0` user, `1` admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl From<Role> for i16 {
    fn from(role: Role) -> Self {
        match role {
            Role::Customer => 0,
            Role::Admin => 1,
        }
    }
}

impl TryFrom<i16> for Role {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Customer),
            1 => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// `POST /api/v1/auth/login` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/v1/auth/register` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    /// Date of birth, free-form as typed into the form.
    #[serde(rename = "DOB", default)]
    pub dob: String,
    /// Answer to the account recovery question.
    #[serde(default)]
    pub answer: String,
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub role: Role,
}

/// The `{success, message}` envelope shared by every auth response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Login and register response. `user` and `token` are omitted on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub status: ApiMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}
