//! Client-side navigation.

use std::sync::{Mutex, PoisonError};

/// A move to another page.
///
/// `intended` carries the page the user was trying to reach, so the login
/// form can send them back there afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub to: String,
    pub intended: Option<String>,
}

impl Navigation {
    #[must_use]
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            to: path.into(),
            intended: None,
        }
    }

    #[must_use]
    pub fn with_intended(mut self, path: impl Into<String>) -> Self {
        self.intended = Some(path.into());
        self
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, navigation: Navigation);
}

/// Keeps every navigation in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn history(&self) -> Vec<Navigation> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Destinations only, oldest first.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.history().into_iter().map(|n| n.to).collect()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, navigation: Navigation) {
        tracing::debug!(to = %navigation.to, "navigate");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(navigation);
    }
}
