//! Schoolyard Core - Shared types library.
//!
//! This crate provides common types used across all Schoolyard components:
//! - `session` - Authentication session controller and role routing
//! - `integration-tests` - Mock collaborators and scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no
//! identity-provider clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and emails, the role and area
//!   enums, and the session/identity/profile models

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
