//! Environment glue shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Keeps storage concerns out of the session and page logic.

pub mod persistence;
