//! Shared client-side state.
//!
//! DESIGN
//! ======
//! Only the auth session is process-wide. Page data is fetched per call and
//! never cached here.

pub mod session;
