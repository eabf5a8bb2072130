//! Login and registration forms, and the session they produce.
//!
//! # Submit outcomes
//!
//! | Server reply | Toast | Session / storage | Navigation |
//! |---|---|---|---|
//! | `success: true` | success, server message (login) | set / raw body under `"auth"` | intended page or `/` |
//! | `success` anything else | error, server message or `None` | untouched | none |
//! | `null` body (login) | none | untouched | none |
//! | transport error, non-2xx, bad JSON | error, "Something went wrong" | untouched | none |
//!
//! A form with an empty required field does not submit at all.

use std::sync::{PoisonError, RwLock};

use emporium_core::{LoginRequest, RegisterRequest, normalize_email};
use serde_json::Value;

use crate::api::JsonReply;
use crate::navigate::Navigation;
use crate::notify::{SOMETHING_WENT_WRONG, Toast, ToastKind, ToastOptions};
use crate::state::ClientState;
use crate::storage::{AUTH_KEY, KeyValueStore};

pub const REGISTERED: &str = "Register Successfully, please login";

// =============================================================================
// Session
// =============================================================================

/// Who is logged in.
///
/// `user` is whatever object the server sent; JSON `null` and a missing
/// field are both `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthSession {
    pub user: Option<Value>,
    pub token: Option<String>,
}

impl AuthSession {
    /// Read `user` and `token` out of a login response body.
    #[must_use]
    pub fn from_response(body: &Value) -> Self {
        Self {
            user: body.get("user").filter(|user| !user.is_null()).cloned(),
            token: body
                .get("token")
                .and_then(Value::as_str)
                .map(str::to_owned),
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// A string field of the user object, e.g. `name` or `address`.
    #[must_use]
    pub fn user_field(&self, field: &str) -> Option<&str> {
        self.user.as_ref()?.get(field)?.as_str()
    }
}

/// In-memory session shared by the pages of one client.
#[derive(Debug, Default)]
pub struct AuthContext {
    session: RwLock<AuthSession>,
}

impl AuthContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the session from the login response persisted under `"auth"`.
    ///
    /// Absent or unreadable data gives a logged-out session.
    #[must_use]
    pub fn restore(storage: &dyn KeyValueStore) -> Self {
        let session = match storage.get(AUTH_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Value>(&raw) {
                Ok(body) => AuthSession::from_response(&body),
                Err(e) => {
                    tracing::warn!(error = %e, "Stored auth is malformed, starting logged out");
                    AuthSession::default()
                }
            },
            Ok(None) => AuthSession::default(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stored auth");
                AuthSession::default()
            }
        };

        Self {
            session: RwLock::new(session),
        }
    }

    #[must_use]
    pub fn session(&self) -> AuthSession {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the user and token.
    pub fn set(&self, session: AuthSession) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    pub fn clear(&self) {
        self.set(AuthSession::default());
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.session().token
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Lifecycle of a form.
///
/// `Initial -> InputFilled -> Submitting -> Success | Error`, and back to
/// `InputFilled` on the next edit. Retries are unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Initial,
    InputFilled,
    Submitting,
    Success,
    Error,
}

/// What a call to `submit` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A required field was empty. Nothing was sent.
    Incomplete,
    /// The server answered `null`. Nothing changed.
    Ignored,
    /// The server accepted the submission.
    Accepted,
    /// The server answered with `success` other than `true`.
    Rejected,
    /// The request failed or the reply was unusable.
    Failed,
}

fn succeeded(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool) == Some(true)
}

fn server_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// The login page form.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    email: String,
    password: String,
    intended: Option<String>,
    state: FormState,
}

impl LoginForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the form after `navigation`, remembering where the user was headed.
    #[must_use]
    pub fn after(navigation: &Navigation) -> Self {
        Self {
            intended: navigation.intended.clone(),
            ..Self::default()
        }
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.state = FormState::InputFilled;
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
        self.state = FormState::InputFilled;
    }

    #[must_use]
    pub const fn state(&self) -> FormState {
        self.state
    }

    /// Send the credentials and apply the reply.
    pub async fn submit(&mut self, client: &ClientState) -> SubmitOutcome {
        let request = LoginRequest {
            email: normalize_email(&self.email),
            password: self.password.clone(),
        };
        if request.email.is_empty() || request.password.is_empty() {
            return SubmitOutcome::Incomplete;
        }

        self.state = FormState::Submitting;
        let outcome = match client.api().login(&request).await {
            Ok(reply) => self.apply(client, &reply),
            Err(e) => {
                tracing::error!(error = %e, "Login request failed");
                client.notify(Toast::error(SOMETHING_WENT_WRONG));
                SubmitOutcome::Failed
            }
        };

        self.state = match outcome {
            SubmitOutcome::Accepted => FormState::Success,
            SubmitOutcome::Ignored | SubmitOutcome::Incomplete => FormState::InputFilled,
            SubmitOutcome::Rejected | SubmitOutcome::Failed => FormState::Error,
        };
        outcome
    }

    fn apply(&self, client: &ClientState, reply: &JsonReply) -> SubmitOutcome {
        let body = &reply.value;
        if body.is_null() {
            return SubmitOutcome::Ignored;
        }

        if !succeeded(body) {
            client.notify(Toast::with_message(ToastKind::Error, server_message(body)));
            return SubmitOutcome::Rejected;
        }

        if let Err(e) = client.storage().set(AUTH_KEY, &reply.raw) {
            tracing::error!(error = %e, "Failed to persist login");
            client.notify(Toast::error(SOMETHING_WENT_WRONG));
            return SubmitOutcome::Failed;
        }

        client.notify(
            Toast::with_message(ToastKind::Success, server_message(body))
                .styled(ToastOptions::login_success()),
        );
        client.auth().set(AuthSession::from_response(body));

        let destination = self.intended.clone().unwrap_or_else(|| "/".to_string());
        client.navigate(Navigation::to(destination));
        SubmitOutcome::Accepted
    }
}

/// The registration page form.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    fields: RegisterRequest,
    state: FormState,
}

impl RegisterForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Change one or more fields.
    pub fn edit(&mut self, change: impl FnOnce(&mut RegisterRequest)) {
        change(&mut self.fields);
        self.state = FormState::InputFilled;
    }

    #[must_use]
    pub const fn fields(&self) -> &RegisterRequest {
        &self.fields
    }

    #[must_use]
    pub const fn state(&self) -> FormState {
        self.state
    }

    fn request(&self) -> Option<RegisterRequest> {
        let request = RegisterRequest {
            email: normalize_email(&self.fields.email),
            ..self.fields.clone()
        };

        let required = [
            &request.name,
            &request.email,
            &request.password,
            &request.phone,
            &request.address,
            &request.dob,
            &request.answer,
        ];
        required
            .iter()
            .all(|value| !value.is_empty())
            .then_some(request)
    }

    /// Send the registration and apply the reply.
    pub async fn submit(&mut self, client: &ClientState) -> SubmitOutcome {
        let Some(request) = self.request() else {
            return SubmitOutcome::Incomplete;
        };

        self.state = FormState::Submitting;
        let outcome = match client.api().register(&request).await {
            Ok(reply) if succeeded(&reply.value) => {
                client.notify(Toast::success(REGISTERED));
                client.navigate(Navigation::to("/login"));
                SubmitOutcome::Accepted
            }
            Ok(reply) if reply.value.is_object() => {
                client.notify(Toast::with_message(
                    ToastKind::Error,
                    server_message(&reply.value),
                ));
                SubmitOutcome::Rejected
            }
            Ok(reply) => {
                tracing::error!(body = %reply.raw, "Unexpected registration reply");
                client.notify(Toast::error(SOMETHING_WENT_WRONG));
                SubmitOutcome::Failed
            }
            Err(e) => {
                tracing::error!(error = %e, "Registration request failed");
                client.notify(Toast::error(SOMETHING_WENT_WRONG));
                SubmitOutcome::Failed
            }
        };

        self.state = if outcome == SubmitOutcome::Accepted {
            FormState::Success
        } else {
            FormState::Error
        };
        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testing::{Harness, Reply};

    fn filled_login(email: &str, password: &str) -> LoginForm {
        let mut form = LoginForm::new();
        form.set_email(email);
        form.set_password(password);
        form
    }

    fn filled_register() -> RegisterForm {
        let mut form = RegisterForm::new();
        form.edit(|f| {
            f.name = "  John Doe  ".into();
            f.email = "  test@example.com  ".into();
            f.password = "  password123  ".into();
            f.phone = "  1234567890  ".into();
            f.address = "  123 Street  ".into();
            f.dob = "1990-01-01".into();
            f.answer = "  Basketball  ".into();
        });
        form
    }

    #[tokio::test]
    async fn test_login_success_effects() {
        let h = Harness::new();
        let body = json!({
            "success": true,
            "user": {"id": 1, "name": "John Doe", "email": "test@example.com"},
            "token": "mockToken"
        });
        h.api.push_login(Reply::Body(body.clone()));

        let mut form = filled_login("test@example.com", "password123");
        assert_eq!(form.submit(&h.client).await, SubmitOutcome::Accepted);
        assert_eq!(form.state(), FormState::Success);

        assert_eq!(
            h.api.login_requests(),
            [LoginRequest {
                email: "test@example.com".into(),
                password: "password123".into(),
            }]
        );

        let toasts = h.notifier.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(
            toasts[0],
            Toast::with_message(ToastKind::Success, None).styled(ToastOptions::login_success())
        );

        let session = h.client.auth().session();
        assert_eq!(session.user, Some(body["user"].clone()));
        assert_eq!(session.token.as_deref(), Some("mockToken"));

        let stored = h.storage.get(AUTH_KEY).unwrap().unwrap();
        assert_eq!(serde_json::from_str::<Value>(&stored).unwrap(), body);

        assert_eq!(h.navigator.paths(), ["/"]);
    }

    #[tokio::test]
    async fn test_login_returns_to_intended_page() {
        let h = Harness::new();
        h.api.push_login(Reply::Body(
            json!({"success": true, "user": {"id": 1}, "token": "t"}),
        ));

        let mut form = LoginForm::after(&Navigation::to("/login").with_intended("/cart"));
        form.set_email("first.last+tag@sub.domain.nus.edu.sg");
        form.set_password("password213");
        form.submit(&h.client).await;

        assert_eq!(h.navigator.paths(), ["/cart"]);
    }

    #[tokio::test]
    async fn test_login_null_user_and_missing_token() {
        let h = Harness::new();
        h.api.push_login(Reply::Body(
            json!({"success": true, "message": "Partial auth", "user": null}),
        ));

        filled_login("a@b.c", "pw").submit(&h.client).await;

        let session = h.client.auth().session();
        assert_eq!(session, AuthSession::default());
        assert_eq!(
            h.notifier.toasts()[0].message.as_deref(),
            Some("Partial auth")
        );
        assert_eq!(h.navigator.paths(), ["/"]);
    }

    #[tokio::test]
    async fn test_login_rejected_shows_server_message_only() {
        let h = Harness::new();
        h.api.push_login(Reply::Body(
            json!({"success": false, "message": "Authentication failed"}),
        ));
        h.api.push_login(Reply::Body(json!({"success": false})));

        let mut form = filled_login("fail@test.com", "wrong");
        assert_eq!(form.submit(&h.client).await, SubmitOutcome::Rejected);
        assert_eq!(form.state(), FormState::Error);
        assert_eq!(form.submit(&h.client).await, SubmitOutcome::Rejected);

        assert_eq!(
            h.notifier.toasts(),
            [
                Toast::error("Authentication failed"),
                Toast::with_message(ToastKind::Error, None)
            ]
        );
        assert_eq!(h.client.auth().session(), AuthSession::default());
        assert_eq!(h.storage.get(AUTH_KEY).unwrap(), None);
        assert!(h.navigator.paths().is_empty());
    }

    #[tokio::test]
    async fn test_login_transport_failure_is_generic() {
        let h = Harness::new();
        h.api.push_login(Reply::Unavailable);

        let mut form = filled_login("test@example.com", "password123");
        assert_eq!(form.submit(&h.client).await, SubmitOutcome::Failed);

        assert_eq!(h.notifier.toasts(), [Toast::error(SOMETHING_WENT_WRONG)]);
        assert_eq!(h.storage.get(AUTH_KEY).unwrap(), None);
        assert!(h.navigator.paths().is_empty());

        form.set_password("again");
        assert_eq!(form.state(), FormState::InputFilled);
    }

    #[tokio::test]
    async fn test_login_null_body_has_no_effects() {
        let h = Harness::new();
        h.api.push_login(Reply::Body(Value::Null));

        let mut form = filled_login("test@example.com", "password123");
        assert_eq!(form.submit(&h.client).await, SubmitOutcome::Ignored);

        assert!(h.notifier.toasts().is_empty());
        assert_eq!(h.client.auth().session(), AuthSession::default());
        assert_eq!(h.storage.get(AUTH_KEY).unwrap(), None);
        assert!(h.navigator.paths().is_empty());
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let h = Harness::new();

        let mut form = filled_login("   ", "password123");
        assert_eq!(form.submit(&h.client).await, SubmitOutcome::Incomplete);
        let mut form = filled_login("test@example.com", "");
        assert_eq!(form.submit(&h.client).await, SubmitOutcome::Incomplete);

        assert!(h.api.login_requests().is_empty());
        assert!(h.notifier.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_login_sends_password_verbatim() {
        let h = Harness::new();
        h.api.push_login(Reply::Body(json!({"success": false})));

        filled_login("  test@test.com ", " my secure password ")
            .submit(&h.client)
            .await;

        let sent = &h.api.login_requests()[0];
        assert_eq!(sent.email, "test@test.com");
        assert_eq!(sent.password, " my secure password ");
    }

    #[tokio::test]
    async fn test_repeated_submits_each_send() {
        let h = Harness::new();
        let mut form = filled_register();
        for _ in 0..3 {
            h.api.push_register(Reply::Body(json!({"success": true})));
            form.submit(&h.client).await;
        }
        assert_eq!(h.api.register_requests().len(), 3);
    }

    #[tokio::test]
    async fn test_register_success() {
        let h = Harness::new();
        h.api.push_register(Reply::Body(json!({"success": true})));

        let mut form = filled_register();
        assert_eq!(form.submit(&h.client).await, SubmitOutcome::Accepted);

        let sent = &h.api.register_requests()[0];
        assert_eq!(sent.name, "  John Doe  ");
        assert_eq!(sent.email, "test@example.com");
        assert_eq!(sent.answer, "  Basketball  ");
        assert_eq!(serde_json::to_value(sent).unwrap()["DOB"], "1990-01-01");

        assert_eq!(h.notifier.toasts(), [Toast::success(REGISTERED)]);
        assert_eq!(h.navigator.paths(), ["/login"]);
        assert_eq!(h.client.auth().session(), AuthSession::default());
    }

    #[tokio::test]
    async fn test_register_failures() {
        let h = Harness::new();
        h.api.push_register(Reply::Body(
            json!({"success": false, "message": "Already registered, please login"}),
        ));
        h.api.push_register(Reply::Unavailable);
        h.api.push_register(Reply::Body(Value::Null));

        let mut form = filled_register();
        assert_eq!(form.submit(&h.client).await, SubmitOutcome::Rejected);
        assert_eq!(form.submit(&h.client).await, SubmitOutcome::Failed);
        assert_eq!(form.submit(&h.client).await, SubmitOutcome::Failed);

        assert_eq!(
            h.notifier.toasts(),
            [
                Toast::error("Already registered, please login"),
                Toast::error(SOMETHING_WENT_WRONG),
                Toast::error(SOMETHING_WENT_WRONG),
            ]
        );
        assert!(h.navigator.paths().is_empty());
    }

    #[tokio::test]
    async fn test_register_requires_every_field() {
        let h = Harness::new();
        let mut form = filled_register();
        form.edit(|f| f.password.clear());

        assert_eq!(form.submit(&h.client).await, SubmitOutcome::Incomplete);
        assert!(h.api.register_requests().is_empty());
    }

    #[test]
    fn test_restore_session_from_storage() {
        let storage = MemoryStorage::new();
        storage
            .set(AUTH_KEY, r#"{"success":true,"user":{"name":"Ada"},"token":"t"}"#)
            .unwrap();
        let context = AuthContext::restore(&storage);
        assert_eq!(context.token().as_deref(), Some("t"));
        assert_eq!(context.session().user_field("name"), Some("Ada"));

        storage.set(AUTH_KEY, "garbage").unwrap();
        assert!(!AuthContext::restore(&storage).session().is_authenticated());

        let empty = MemoryStorage::new();
        assert_eq!(AuthContext::restore(&empty).session(), AuthSession::default());
    }
}
