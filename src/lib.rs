//! # shelve
//!
//! Client core for the Shelve book tracking and recommendation service.
//!
//! The crate holds the client-side session store with its persistence, the
//! route guard that gates navigation on session state, REST wrappers for the
//! gateway, and the page controllers that tie them together. The `shelve`
//! binary drives all of it from the command line.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;
