//! Toast notifications.
//!
//! Rendering is someone else's job; this module only describes what should
//! be shown. [`TracingNotifier`] logs toasts, [`RecordingNotifier`] keeps
//! them for inspection.

use std::sync::{Mutex, PoisonError};

/// Generic failure message shown for transport errors and anything unexpected.
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Presentation options for a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastOptions {
    pub duration_ms: u64,
    pub icon: String,
    pub background: String,
    pub color: String,
}

impl ToastOptions {
    /// Style used for the login success toast.
    #[must_use]
    pub fn login_success() -> Self {
        Self {
            duration_ms: 5000,
            icon: "🙏".to_string(),
            background: "green".to_string(),
            color: "white".to_string(),
        }
    }
}

/// One notification.
///
/// `message` is `None` when the server sent none. It is never replaced by a
/// default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: Option<String>,
    pub options: Option<ToastOptions>,
}

impl Toast {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: Some(message.into()),
            options: None,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: Some(message.into()),
            options: None,
        }
    }

    /// A toast whose message may be absent.
    #[must_use]
    pub const fn with_message(kind: ToastKind, message: Option<String>) -> Self {
        Self {
            kind,
            message,
            options: None,
        }
    }

    #[must_use]
    pub fn styled(mut self, options: ToastOptions) -> Self {
        self.options = Some(options);
        self
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Writes toasts to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        let message = toast.message.as_deref().unwrap_or_default();
        match toast.kind {
            ToastKind::Success => tracing::info!(toast = message, "notification"),
            ToastKind::Error => tracing::warn!(toast = message, "notification"),
        }
    }
}

/// Keeps every toast in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toasts shown so far, oldest first.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(toast);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Toast::success("Item Added to cart"));
        notifier.notify(Toast::with_message(ToastKind::Error, None));

        let toasts = notifier.toasts();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].message.as_deref(), Some("Item Added to cart"));
        assert_eq!(toasts[1].kind, ToastKind::Error);
        assert_eq!(toasts[1].message, None);
    }

    #[test]
    fn test_login_success_style() {
        let toast =
            Toast::with_message(ToastKind::Success, None).styled(ToastOptions::login_success());
        let options = toast.options.unwrap();
        assert_eq!(options.duration_ms, 5000);
        assert_eq!(options.icon, "🙏");
        assert_eq!(options.background, "green");
        assert_eq!(options.color, "white");
    }
}
