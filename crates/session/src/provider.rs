//! Collaborator seams for the session controller.
//!
//! The controller talks to the outside world through three traits: the
//! identity provider (session issuance and the auth-change stream), the
//! profile store (role records), and the navigator (view-stack replacement).
//! Production code wires real clients behind these; tests wire mocks.

use async_trait::async_trait;
use tokio::sync::mpsc;

use schoolyard_core::{AreaToken, Profile, Session, UserId};

use crate::error::{IdentityError, LookupError, NavigationError};

/// A change pushed by the identity provider's auth-event stream.
#[derive(Debug, Clone)]
pub enum AuthChange {
    /// A user completed sign-in; carries the fresh session.
    SignedIn(Session),
    /// The provider replayed whatever session existed at subscription time.
    InitialSession(Option<Session>),
    /// The access token was rotated; the identity is unchanged.
    TokenRefreshed(Session),
    /// The user's session ended.
    SignedOut,
    /// The user entered the password-recovery flow.
    PasswordRecovery,
}

/// External identity provider client.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// One-shot probe for the current session.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Unavailable`] if the provider cannot be
    /// reached. The controller treats a failed probe as unauthenticated.
    async fn get_session(&self) -> Result<Option<Session>, IdentityError>;

    /// Invalidate the current session with the provider.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::SignOutRejected`] if the provider refuses
    /// the call. A successful sign-out is confirmed by a
    /// [`AuthChange::SignedOut`] event on the stream.
    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Subscribe to the continuous auth-change stream.
    ///
    /// Every call returns an independent receiver; the controller subscribes
    /// exactly once per initialization.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<AuthChange>;
}

/// Lookup of role records by identity id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Look up the profile for an identity.
    ///
    /// Implementations should return `Ok(None)` both when no record exists
    /// and when the record carries no usable role.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the store cannot be queried.
    async fn profile_by_id(&self, id: UserId) -> Result<Option<Profile>, LookupError>;
}

/// View-stack navigation.
pub trait Navigator: Send + Sync {
    /// Replace the current view stack with the given area's root screen.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError`] if the transition is rejected. The
    /// controller logs the failure and keeps its state; it never retries.
    fn replace(&self, area: AreaToken) -> Result<(), NavigationError>;
}
