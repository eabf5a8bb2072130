//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Registration, password login and token verification

pub mod auth;
