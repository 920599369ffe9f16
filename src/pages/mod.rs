//! Page controllers: the glue between user actions, the gateway and the
//! session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each controller first checks the route guard for its own page, then
//! validates its form, calls the gateway, feeds the result into
//! [`SessionStore`] and returns the route the caller should land on. A page
//! the guard would not show refuses with [`PageError::Redirect`] before any
//! request is made. The store never sees a failed call.
//!
//! ERROR HANDLING
//! ==============
//! An authenticated call rejected with [`ApiError::Unauthorized`] logs the
//! session out before the error is returned, so a stale token leaves the
//! client in the logged-out state. Pages built from several independent
//! sections (home, book detail) degrade per section: a failed section is
//! logged and left empty, but an unauthorized one still expires the session.

pub mod book;
pub mod discover;
pub mod home;
pub mod login;
pub mod onboarding;
pub mod profile;
pub mod register;
pub mod shelves;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use crate::net::api::ApiError;
use crate::routes::Route;
use crate::routes::guard::{evaluate_route, resolve};
use crate::state::session::SessionStore;

/// Errors surfaced to whoever drives a page.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Form input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The action needs a session and there is none.
    #[error("not logged in")]
    NotAuthenticated,

    /// The guard does not allow this page for the current session.
    #[error("page not available; continue at {}", .0.path())]
    Redirect(Route),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Refuse to act unless the guard allows `page` right now. The error carries
/// the route the redirect chain settles on.
pub(crate) fn require_route(store: &SessionStore, page: Route) -> Result<(), PageError> {
    let state = store.guard_state();
    if evaluate_route(state, &page).is_allowed() {
        return Ok(());
    }
    let target = resolve(state, page.clone());
    tracing::debug!(page = %page.path(), to = %target.path(), "page refused by route guard");
    Err(PageError::Redirect(target))
}

/// Bearer token of the current session.
pub(crate) fn require_token(store: &SessionStore) -> Result<String, PageError> {
    store.token().ok_or(PageError::NotAuthenticated)
}

/// Convert an error from an authenticated call, expiring the session on 401.
pub(crate) fn expire_on_unauthorized(store: &SessionStore, err: ApiError) -> PageError {
    if matches!(err, ApiError::Unauthorized) {
        tracing::warn!("gateway rejected session token; logging out");
        store.logout();
    }
    PageError::Api(err)
}

/// Keep a secondary section's value, or log and fall back to its default.
pub(crate) fn best_effort<T: Default>(
    store: &SessionStore,
    section: &str,
    result: Result<T, ApiError>,
) -> Result<T, PageError> {
    match result {
        Ok(value) => Ok(value),
        Err(ApiError::Unauthorized) => Err(expire_on_unauthorized(store, ApiError::Unauthorized)),
        Err(e) => {
            tracing::warn!(section, error = %e, "page section unavailable");
            Ok(T::default())
        }
    }
}

/// Reject blank input with a field-specific message.
pub(crate) fn require_field(value: &str, field: &str) -> Result<(), PageError> {
    if value.trim().is_empty() {
        return Err(PageError::Validation(format!("{field} is required")));
    }
    Ok(())
}
