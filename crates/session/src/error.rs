//! Error types for the session controller's collaborators.
//!
//! All of these are logged at the boundary where the asynchronous call is
//! awaited and degrade to routing the user to the login area. None of them
//! are fatal to the process.

use thiserror::Error;

/// Errors surfaced by the identity provider client.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider could not be reached.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// The provider rejected the sign-out call.
    #[error("sign-out rejected: {0}")]
    SignOutRejected(String),
}

/// Errors surfaced by the profile store.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The store could not be reached.
    #[error("profile store unavailable: {0}")]
    Unavailable(String),

    /// The lookup query itself failed.
    #[error("profile query failed: {0}")]
    Query(String),
}

/// Errors surfaced by the navigator.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The navigator does not know the requested area token.
    #[error("unknown area token: {0}")]
    UnknownArea(String),

    /// The transition was rejected by the view layer.
    #[error("navigation rejected: {0}")]
    Rejected(String),
}
