//! Networking for the Shelve REST gateway.
//!
//! SYSTEM CONTEXT
//! ==============
//! `types` defines the wire schema and `api` wraps the HTTP calls behind the
//! [`api::ShelveApi`] trait consumed by page controllers.

pub mod api;
pub mod types;
