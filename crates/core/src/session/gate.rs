//! Login screen state.

use super::storage::LocalStorage;
use crate::constants::TOKEN_STORAGE_KEY;
use crate::notifications::Notifications;
use crate::route::Route;
use crate::ReportResult;
use api_client::{Authenticator, Credentials};
use report_types::EmailAddress;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Logged in successfully!";

/// Credentials being typed plus the inline error of the last attempt.
#[derive(Debug, Default, Clone)]
pub struct SessionGate {
    pub email: String,
    pub password: String,
    error: Option<String>,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            error: None,
        }
    }

    /// Inline error shown under the form, if the last submit failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submits the credentials once.
    ///
    /// Returns the route to navigate to on success, `Ok(None)` when the attempt was rejected
    /// (see [`error`](Self::error)). An invalid email never reaches the authenticator. Only a
    /// failure to persist the token is returned as an error.
    pub async fn submit(
        &mut self,
        auth: &impl Authenticator,
        storage: &mut impl LocalStorage,
        notices: &mut Notifications,
    ) -> ReportResult<Option<Route>> {
        self.error = None;

        let email = match EmailAddress::parse(&self.email) {
            Ok(email) => email,
            Err(e) => {
                self.error = Some(e.to_string());
                return Ok(None);
            }
        };

        let credentials = Credentials::new(email.into_string(), self.password.clone());
        match auth.login(&credentials).await {
            Ok(response) => {
                storage.set_item(TOKEN_STORAGE_KEY, &response.access_token)?;
                tracing::info!(email = %credentials.email, "login succeeded");
                notices.success(LOGIN_SUCCESS_MESSAGE);
                Ok(Some(Route::MedicalReport))
            }
            Err(e) => {
                tracing::warn!(email = %credentials.email, error = ?e, "login rejected");
                self.error = Some(e.to_string());
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::NotificationVariant;
    use crate::session::storage::MemoryStorage;
    use api_client::{AuthError, LoginResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Outcome {
        Token(&'static str),
        Rejected(&'static str),
        Failed,
    }

    struct FakeAuth {
        outcome: Outcome,
        calls: AtomicUsize,
    }

    impl FakeAuth {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Authenticator for FakeAuth {
        async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Outcome::Token(t) => Ok(LoginResponse {
                    access_token: t.to_string(),
                }),
                Outcome::Rejected(msg) => Err(AuthError::Rejected(msg.to_string())),
                Outcome::Failed => Err(AuthError::Failed),
            }
        }
    }

    #[tokio::test]
    async fn test_successful_login_stores_token_and_navigates() {
        let auth = FakeAuth::new(Outcome::Token("tok123"));
        let mut storage = MemoryStorage::new();
        let mut notices = Notifications::new();
        let mut gate = SessionGate::with_credentials("a@b.com", "x");

        let route = gate.submit(&auth, &mut storage, &mut notices).await.unwrap();

        assert_eq!(route, Some(Route::MedicalReport));
        assert_eq!(
            storage.get_item(TOKEN_STORAGE_KEY).unwrap().as_deref(),
            Some("tok123")
        );
        assert_eq!(gate.error(), None);
        let notice = notices.drain().next().unwrap();
        assert_eq!(notice.variant, NotificationVariant::Success);
        assert_eq!(notice.message, "Logged in successfully!");
    }

    #[tokio::test]
    async fn test_invalid_emails_never_reach_authenticator() {
        let auth = FakeAuth::new(Outcome::Token("tok123"));
        let mut storage = MemoryStorage::new();
        let mut notices = Notifications::new();

        for email in ["", "plain", "a@b", "a b@c.com", "@b.com", "a@b.com "] {
            let mut gate = SessionGate::with_credentials(email, "x");
            let route = gate.submit(&auth, &mut storage, &mut notices).await.unwrap();
            assert_eq!(route, None, "{email:?} should be rejected");
            assert_eq!(gate.error(), Some("Please enter a valid email address."));
        }

        assert_eq!(auth.calls(), 0);
        assert_eq!(storage.get_item(TOKEN_STORAGE_KEY).unwrap(), None);
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn test_server_message_is_shown_verbatim() {
        let auth = FakeAuth::new(Outcome::Rejected("Invalid credentials"));
        let mut storage = MemoryStorage::new();
        let mut notices = Notifications::new();
        let mut gate = SessionGate::with_credentials("a@b.com", "wrong");

        let route = gate.submit(&auth, &mut storage, &mut notices).await.unwrap();

        assert_eq!(route, None);
        assert_eq!(gate.error(), Some("Invalid credentials"));
        assert_eq!(auth.calls(), 1);
        assert_eq!(storage.get_item(TOKEN_STORAGE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_generic_failure_and_error_reset_on_resubmit() {
        let failing = FakeAuth::new(Outcome::Failed);
        let mut storage = MemoryStorage::new();
        let mut notices = Notifications::new();
        let mut gate = SessionGate::with_credentials("a@b.com", "x");

        gate.submit(&failing, &mut storage, &mut notices).await.unwrap();
        assert_eq!(gate.error(), Some("Login failed"));

        let ok = FakeAuth::new(Outcome::Token("t"));
        let route = gate.submit(&ok, &mut storage, &mut notices).await.unwrap();
        assert_eq!(route, Some(Route::MedicalReport));
        assert_eq!(gate.error(), None);
    }
}
