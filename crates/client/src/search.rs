//! Header search box and the results it hands to the search page.

use std::sync::{PoisonError, RwLock};

use emporium_core::Product;

use crate::navigate::Navigation;
use crate::state::ClientState;

/// Keyword being typed and the results of the last search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub keyword: String,
    pub results: Vec<Product>,
}

#[derive(Debug, Default)]
pub struct SearchContext {
    state: RwLock<SearchResults>,
}

impl SearchContext {
    #[must_use]
    pub fn snapshot(&self) -> SearchResults {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn keyword(&self) -> String {
        self.snapshot().keyword
    }

    /// Update the keyword as the user types. Nothing is fetched.
    pub fn set_keyword(&self, keyword: impl Into<String>) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .keyword = keyword.into();
    }

    fn store(&self, keyword: String, results: Vec<Product>) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) =
            SearchResults { keyword, results };
    }
}

/// Run the search for the current keyword and open the results page.
///
/// The keyword is sent as typed, whitespace and regex characters included.
/// A failed search is logged and changes nothing. Returns whether the
/// search went through.
pub async fn submit(client: &ClientState) -> bool {
    let keyword = client.search().keyword();

    match client.api().search(&keyword).await {
        Ok(results) => {
            client.search().store(keyword, results);
            client.navigate(Navigation::to("/search"));
            true
        }
        Err(e) => {
            tracing::error!(error = %e, keyword = %keyword, "Search request failed");
            false
        }
    }
}
