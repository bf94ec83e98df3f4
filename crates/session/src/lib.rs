//! Schoolyard Session - authentication session and role routing.
//!
//! This crate owns the process-wide authentication state: the current
//! session, the resolved profile, and the decision of which top-level
//! application area to activate for a signed-in user.
//!
//! # Architecture
//!
//! The [`SessionController`] reconciles two asynchronous event sources - a
//! one-shot session probe at startup and the identity provider's continuous
//! auth-change stream - and converges both on a single profile-resolution
//! path. Navigation decisions are guarded so that concurrent triggers
//! produce exactly one view-stack transition.
//!
//! External collaborators (identity provider, profile store, navigator) are
//! trait seams in [`provider`], so the controller can be driven by mocks in
//! tests and by real clients in the application shell.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod controller;
pub mod error;
pub mod provider;
pub mod state;

pub use config::{ConfigError, SessionConfig};
pub use controller::SessionController;
pub use error::{IdentityError, LookupError, NavigationError};
pub use provider::{AuthChange, IdentityProvider, Navigator, ProfileStore};
pub use state::SessionSnapshot;
