//! Authentication request wrapper.
//!
//! The login endpoint is consumed purely as a request/response contract:
//! `POST <base-url>/api/auth/login` with `{ email, password }`, answering either
//! `{ access_token }` or an error body carrying `msg`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Path of the login endpoint, relative to the configured base URL.
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Credentials submitted by the login screen. Never persisted.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
}

/// Errors returned by an [`Authenticator`].
///
/// The `Display` output of every variant is the message shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The server rejected the credentials and explained why.
    #[error("{0}")]
    Rejected(String),
    /// The server rejected the credentials without a usable message.
    #[error("Login failed")]
    Failed,
    #[error("Login failed")]
    Transport(#[source] reqwest::Error),
    #[error("Login failed")]
    MalformedResponse(#[source] reqwest::Error),
}

/// Something that can exchange credentials for a session token.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError>;
}

/// HTTP implementation of [`Authenticator`].
#[derive(Clone, Debug)]
pub struct AuthClient {
    http: reqwest::Client,
    login_url: String,
}

impl AuthClient {
    /// Creates a client for the given base URL (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        let login_url = format!("{}{}", base_url.trim_end_matches('/'), LOGIN_PATH);
        Self { http, login_url }
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }
}

#[async_trait]
impl Authenticator for AuthClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        tracing::debug!(url = %self.login_url, email = %credentials.email, "submitting login");

        let response = self
            .http
            .post(&self.login_url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("login request failed: {}", e);
                AuthError::Transport(e)
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<LoginResponse>()
                .await
                .map_err(AuthError::MalformedResponse);
        }

        let msg = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.msg)
            .filter(|msg| !msg.trim().is_empty());

        tracing::warn!(status = status.as_u16(), "login rejected");

        match msg {
            Some(msg) => Err(AuthError::Rejected(msg)),
            None => Err(AuthError::Failed),
        }
    }
}
