//! Application context: the explicitly constructed container every page and
//! the route guard read from.
//!
//! DESIGN
//! ======
//! There is no ambient global session. `App` is built once at startup from
//! config (which restores the persisted session) and handed down by
//! reference. Dropping it is the whole teardown; storage is written through
//! on every transition so nothing is left to flush.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use crate::config::ShelveConfig;
use crate::net::api::{ApiError, HttpApi, ShelveApi};
use crate::routes::Route;
use crate::routes::guard::{GuardOutcome, evaluate_route, resolve};
use crate::state::session::SessionStore;
use crate::util::persistence::{FileStorage, KeyValueStorage};

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("no route matches {0}")]
    NotFound(String),
}

/// Outcome of one navigation attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub requested: Route,
    pub outcome: GuardOutcome,
    /// Where the user actually ends up.
    pub landed: Route,
}

#[derive(Clone)]
pub struct App {
    pub store: Arc<SessionStore>,
    pub api: Arc<dyn ShelveApi>,
}

impl App {
    #[must_use]
    pub fn new(store: Arc<SessionStore>, api: Arc<dyn ShelveApi>) -> Self {
        Self { store, api }
    }

    /// Restore the session from the configured state dir and connect the
    /// HTTP gateway client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ShelveConfig) -> Result<Self, ApiError> {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::new(&config.state_dir));
        let store = Arc::new(SessionStore::open(storage));
        let api: Arc<dyn ShelveApi> = Arc::new(HttpApi::new(&config.api)?);
        tracing::debug!(
            base_url = %config.api.base_url,
            state_dir = %config.state_dir.display(),
            authenticated = store.is_authenticated(),
            "app initialized"
        );
        Ok(Self::new(store, api))
    }

    /// Resolve `path` against the current session.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::NotFound`] if no route matches.
    pub fn navigate(&self, path: &str) -> Result<Navigation, NavigationError> {
        let requested = Route::parse(path).ok_or_else(|| NavigationError::NotFound(path.to_owned()))?;
        Ok(self.navigate_to(requested))
    }

    /// Evaluate the guard for `requested` and follow any redirect chain.
    /// `outcome` is the first decision; `landed` is where the chain settles.
    #[must_use]
    pub fn navigate_to(&self, requested: Route) -> Navigation {
        let state = self.store.guard_state();
        let outcome = evaluate_route(state, &requested);
        let landed = resolve(state, requested.clone());
        tracing::debug!(from = %requested.path(), to = %landed.path(), ?outcome, "navigation resolved");
        Navigation { requested, outcome, landed }
    }
}
