//! Session and identity types issued by the identity provider.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;

/// A stable reference to an authenticated user.
///
/// Bound 1:1 to a [`Session`] while that session is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned user id.
    pub id: UserId,
    /// Email the user signed in with.
    pub email: Email,
    /// Free-form provider metadata (e.g. sign-up attributes).
    #[serde(default)]
    pub attributes: serde_json::Value,
}

/// Provider-issued credential bundle representing an authenticated identity.
///
/// Created on sign-in, replaced on token refresh, destroyed on sign-out.
/// Owned exclusively by the identity provider; the controller only holds a
/// transient, replaceable reference.
#[derive(Debug, Clone)]
pub struct Session {
    /// Bearer token for API calls. Never logged.
    pub access_token: SecretString,
    /// Token used to mint the next access token. Never logged.
    pub refresh_token: SecretString,
    /// When the access token expires.
    pub expires_at: DateTime<Utc>,
    /// The identity this session authenticates.
    pub identity: Identity,
}

impl Session {
    /// Whether the access token has already expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
