//! Emporium client library.
//!
//! The shopper-facing behaviors of the storefront, independent of any UI
//! toolkit: the cart kept in local storage, the login and registration
//! forms, the header search box, and the homepage and cart page
//! view-models. Side effects go through injected seams:
//!
//! - [`api::StorefrontApi`] - the storefront HTTP API ([`api::HttpApi`] over `reqwest`)
//! - [`storage::KeyValueStore`] - local storage (memory or a JSON file)
//! - [`notify::Notifier`] - toasts
//! - [`navigate::Navigator`] - page changes
//!
//! [`ClientState`] ties one set of these together with the session, cart
//! and search state they share.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod cart_page;
pub mod config;
pub mod homepage;
pub mod navigate;
pub mod notify;
pub mod search;
pub mod state;
pub mod storage;

#[cfg(test)]
mod testing;

pub use state::ClientState;
