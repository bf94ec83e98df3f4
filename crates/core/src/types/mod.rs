//! Core types for Schoolyard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod area;
pub mod email;
pub mod id;
pub mod profile;
pub mod role;
pub mod session;

pub use area::AreaToken;
pub use email::{Email, EmailError};
pub use id::*;
pub use profile::Profile;
pub use role::Role;
pub use session::{Identity, Session};
