//! Email handling for the account forms and registration.
//!
//! The client only trims ([`normalize_email`]); the storefront checks the
//! shape once more with [`Email::parse`] before creating an account. Login
//! does not parse: an address that was never registered is simply unknown.

use core::fmt;

/// Why a registration email was refused.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email must contain exactly one @")]
    AtSymbol,
    #[error("email needs text on both sides of the @")]
    MissingPart,
}

/// Trim surrounding whitespace, as the email field of both forms does.
///
/// Case is preserved and nothing is validated.
///
/// ```
/// use emporium_core::normalize_email;
///
/// assert_eq!(normalize_email("  shopper@example.com\n"), "shopper@example.com");
/// assert_eq!(normalize_email("Shopper@Example.com"), "Shopper@Example.com");
/// ```
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_owned()
}

/// An email accepted for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// Check the rough shape `local@domain`.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty or over-long address, a missing or
    /// repeated `@`, or an empty side.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::AtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::AtSymbol);
        }
        if local.is_empty() || domain.is_empty() {
            return Err(EmailError::MissingPart);
        }

        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
