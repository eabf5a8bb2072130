//! Core types for Emporium.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod auth;
pub mod email;
pub mod id;
pub mod price;
pub mod product;

pub use auth::{ApiMessage, LoginRequest, LoginResponse, RegisterRequest, Role, UserProfile};
pub use email::{Email, EmailError, normalize_email};
pub use id::*;
pub use price::{PriceRange, PriceRangeError, format_usd};
pub use product::{Category, Product, ProductFilters};
