//! Display identity decoded from the stored session token.
//!
//! The token is treated as a JWT: the second dot-separated segment is base64url-encoded JSON.
//! The signature is never verified; the claim is only shown to the user.

use super::storage::LocalStorage;
use crate::constants::TOKEN_STORAGE_KEY;
use base64::{engine::general_purpose, Engine as _};
use report_types::NonEmptyText;
use serde::Deserialize;

/// Placeholder shown when no usable token is stored.
pub const PLACEHOLDER_NAME: &str = "User";

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
    email: Option<String>,
}

/// The signed-in user as shown in the avatar. `claim` is `None` for the placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    claim: Option<NonEmptyText>,
}

impl Identity {
    /// Reads the token from storage and decodes its identifying claim.
    ///
    /// Never fails: a missing, unreadable or undecodable token yields the placeholder identity.
    pub fn from_storage(storage: &impl LocalStorage) -> Self {
        match storage.get_item(TOKEN_STORAGE_KEY) {
            Ok(Some(token)) => Self::from_token(&token),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("failed to read stored token: {}", e);
                Self::default()
            }
        }
    }

    pub fn from_token(token: &str) -> Self {
        match decode_claim(token) {
            Some(claim) => Self { claim: Some(claim) },
            None => {
                tracing::error!("Invalid token");
                Self::default()
            }
        }
    }

    /// Full claim, as shown in the avatar tooltip.
    pub fn display_name(&self) -> &str {
        self.claim
            .as_ref()
            .map_or(PLACEHOLDER_NAME, NonEmptyText::as_str)
    }

    /// First character of the claim, upper-cased.
    pub fn avatar_initial(&self) -> char {
        self.claim.as_ref().map_or('U', NonEmptyText::initial)
    }

    pub fn is_placeholder(&self) -> bool {
        self.claim.is_none()
    }
}

fn decode_claim(token: &str) -> Option<NonEmptyText> {
    let payload = token.split('.').nth(1)?;
    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    claims
        .sub
        .or(claims.email)
        .and_then(|claim| NonEmptyText::new(claim).ok())
}
