//! Cart page view-model.

use emporium_core::{Product, format_usd};

use crate::auth::AuthSession;
use crate::navigate::Navigation;
use crate::state::ClientState;

pub const EMPTY_CART: &str = "Your Cart Is Empty";
pub const LOGIN_TO_CHECKOUT: &str = "please login to checkout";
pub const PROFILE_PAGE: &str = "/dashboard/user/profile";

/// What the cart page shows, taken from the session and cart at one moment.
#[derive(Debug, Clone)]
pub struct CartPage {
    session: AuthSession,
    entries: Vec<Product>,
    total: f64,
}

impl CartPage {
    #[must_use]
    pub fn new(client: &ClientState) -> Self {
        Self {
            session: client.auth().session(),
            entries: client.cart().entries(),
            total: client.cart().total(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[Product] {
        &self.entries
    }

    /// `Hello Guest`, or `Hello <name>` once logged in.
    #[must_use]
    pub fn greeting(&self) -> String {
        match self.session.user_field("name") {
            Some(name) if self.session.is_authenticated() => format!("Hello {name}"),
            _ => "Hello Guest".to_string(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> String {
        if self.entries.is_empty() {
            return EMPTY_CART.to_string();
        }

        let count = self.entries.len();
        if self.session.is_authenticated() {
            format!("You Have {count} items in your cart")
        } else {
            format!("You Have {count} items in your cart {LOGIN_TO_CHECKOUT}")
        }
    }

    /// `Total : $1,234.50`
    #[must_use]
    pub fn total_line(&self) -> String {
        format!("Total : {}", format_usd(self.total))
    }

    /// The saved delivery address, if the user has one.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.session
            .user_field("address")
            .filter(|address| !address.is_empty())
    }

    /// Where the checkout button leads before payment can start.
    ///
    /// Guests go to the login page, which returns them to `/cart`. Users
    /// without an address go to their profile. `None` means the user is
    /// ready to pay.
    #[must_use]
    pub fn checkout_destination(&self) -> Option<Navigation> {
        if !self.session.is_authenticated() {
            return Some(Navigation::to("/login").with_intended("/cart"));
        }
        if self.address().is_none() {
            return Some(Navigation::to(PROFILE_PAGE));
        }
        None
    }

    /// Follow [`CartPage::checkout_destination`]. Returns whether it navigated.
    pub fn checkout(&self, client: &ClientState) -> bool {
        let Some(navigation) = self.checkout_destination() else {
            return false;
        };
        client.navigate(navigation);
        true
    }
}
