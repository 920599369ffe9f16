//! Auth-session store for the signed-in Shelve user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the route guard on every navigation and by page controllers that
//! need the bearer token. Mutated only through the four transitions below.
//!
//! DESIGN
//! ======
//! State sits in a `tokio::sync::watch` channel. Every transition funnels
//! through [`SessionStore::transition`], which computes the next state,
//! writes it to storage and publishes it while holding the channel's write
//! lock. Readers and subscribers see either the old state or the new one,
//! never a mix, and concurrent callers are serialized by that same lock.
//!
//! `is_authenticated` is derived from `token` and `user` instead of being
//! stored, so the two cannot drift apart in memory. The persisted record
//! still carries the flag; a record where it disagrees is discarded.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::net::types::{AuthResponse, UserPatch, UserSummary};
use crate::routes::guard::GuardState;
use crate::util::persistence::{self, KeyValueStorage};

/// Storage key the session record lives under.
pub const SESSION_STORAGE_KEY: &str = "shelve-auth";

// =============================================================================
// SESSION
// =============================================================================

/// Snapshot of the client session.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Bearer token; present iff signed in.
    pub token: Option<String>,
    pub user: Option<UserSummary>,
    /// True until the signed-in user finishes onboarding.
    pub needs_onboarding: bool,
}

impl Session {
    fn authenticated(response: &AuthResponse) -> Self {
        Self {
            token: Some(response.token.clone()),
            user: Some(UserSummary::from(response)),
            needs_onboarding: response.first_login || !response.onboarding_complete,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// The two booleans the route guard decides on.
    #[must_use]
    pub fn guard_state(&self) -> GuardState {
        GuardState { is_authenticated: self.is_authenticated(), needs_onboarding: self.needs_onboarding }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .field("needs_onboarding", &self.needs_onboarding)
            .finish()
    }
}

// =============================================================================
// PERSISTED RECORD
// =============================================================================

/// On-disk layout of the session (one record under [`SESSION_STORAGE_KEY`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PersistedSession {
    pub token: Option<String>,
    pub user: Option<UserSummary>,
    pub is_authenticated: bool,
    pub needs_onboarding: bool,
}

impl From<&Session> for PersistedSession {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            user: session.user.clone(),
            is_authenticated: session.is_authenticated(),
            needs_onboarding: session.needs_onboarding,
        }
    }
}

impl PersistedSession {
    /// Convert back to a [`Session`], or `None` if the record is inconsistent.
    pub(crate) fn into_session(self) -> Option<Session> {
        if self.token.is_some() != self.user.is_some() {
            return None;
        }
        let session = Session { token: self.token, user: self.user, needs_onboarding: self.needs_onboarding };
        if session.is_authenticated() != self.is_authenticated {
            return None;
        }
        if session.needs_onboarding && !session.is_authenticated() {
            return None;
        }
        Some(session)
    }
}

fn restore(storage: &dyn KeyValueStorage, key: &str) -> Session {
    let Some(record) = persistence::load_json::<PersistedSession>(storage, key) else {
        return Session::default();
    };
    if let Some(session) = record.into_session() {
        tracing::debug!(authenticated = session.is_authenticated(), "session restored");
        session
    } else {
        tracing::warn!(%key, "persisted session inconsistent; starting logged out");
        Session::default()
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Owner of the process session. Share it as `Arc<SessionStore>`.
pub struct SessionStore {
    state: watch::Sender<Session>,
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl SessionStore {
    /// Restore the session from `storage`, falling back to logged-out.
    #[must_use]
    pub fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::open_with_key(storage, SESSION_STORAGE_KEY)
    }

    /// Like [`SessionStore::open`] with a custom storage key.
    #[must_use]
    pub fn open_with_key(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let initial = restore(storage.as_ref(), &key);
        Self { state: watch::Sender::new(initial), storage, key }
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver that is notified whenever the session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserSummary> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn needs_onboarding(&self) -> bool {
        self.state.borrow().needs_onboarding
    }

    #[must_use]
    pub fn guard_state(&self) -> GuardState {
        self.state.borrow().guard_state()
    }

    /// Replace the session with the identity from a successful login or
    /// registration.
    pub fn set_auth(&self, response: &AuthResponse) {
        let next = Session::authenticated(response);
        tracing::info!(user_id = %response.user_id, needs_onboarding = next.needs_onboarding, "session authenticated");
        self.transition(|_| next);
    }

    /// Merge `patch` into the current user. No-op when signed out.
    pub fn update_user(&self, patch: &UserPatch) {
        self.transition(|current| {
            let Some(user) = &current.user else {
                tracing::debug!("update_user without a session; ignored");
                return current.clone();
            };
            Session { user: Some(user.merged(patch)), ..current.clone() }
        });
    }

    /// Mark onboarding finished for the session and its user.
    pub fn complete_onboarding(&self) {
        let changed = self.transition(|current| Session {
            token: current.token.clone(),
            user: current.user.as_ref().map(|u| UserSummary { onboarding_complete: true, ..u.clone() }),
            needs_onboarding: false,
        });
        if changed {
            tracing::info!("onboarding completed");
        }
    }

    /// Drop the session entirely.
    pub fn logout(&self) {
        if self.transition(|_| Session::default()) {
            tracing::info!("session logged out");
        }
    }

    /// Delete the persisted record and reset to logged-out.
    pub fn clear_storage(&self) {
        let storage = self.storage.as_ref();
        let key = self.key.as_str();
        self.state.send_if_modified(|current| {
            persistence::remove(storage, key);
            let changed = *current != Session::default();
            *current = Session::default();
            changed
        });
        tracing::info!(%key, "session storage cleared");
    }

    /// Apply `next` under the write lock, persist the result and notify
    /// subscribers if anything changed. Returns whether state changed.
    fn transition<F>(&self, next: F) -> bool
    where
        F: FnOnce(&Session) -> Session,
    {
        let storage = self.storage.as_ref();
        let key = self.key.as_str();
        self.state.send_if_modified(|current| {
            let updated = next(current);
            persistence::save_json(storage, key, &PersistedSession::from(&updated));
            if updated == *current {
                return false;
            }
            *current = updated;
            true
        })
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("key", &self.key)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
