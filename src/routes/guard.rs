//! Route guard: decides whether a destination is reachable for a session.
//!
//! Rules, by destination class:
//! - public (login, register): signed-in users go home, everyone else passes.
//! - onboarding: requires a session, and only while onboarding is pending.
//! - protected: requires a session with onboarding done.
//!
//! The guard performs no navigation itself; callers act on the outcome. A
//! redirect target may itself redirect (a signed-in user with onboarding
//! pending who opens `/login` goes home, then on to onboarding), so
//! [`resolve`] follows the chain until a route is allowed.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::Route;

/// Longest redirect chain [`resolve`] follows. Reachable states settle in
/// at most two hops.
pub const MAX_REDIRECTS: usize = 3;

/// Class of a navigation target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Destination {
    Public,
    Onboarding,
    Protected,
}

impl Destination {
    pub const ALL: [Self; 3] = [Self::Public, Self::Onboarding, Self::Protected];
}

/// Session facts the guard decides on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GuardState {
    pub is_authenticated: bool,
    pub needs_onboarding: bool,
}

/// Result of one guard evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GuardOutcome {
    Allow,
    RedirectToLogin,
    RedirectToOnboarding,
    RedirectToHome,
}

impl GuardOutcome {
    /// Where a redirect outcome points; `None` for [`GuardOutcome::Allow`].
    #[must_use]
    pub const fn redirect_target(self) -> Option<Route> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin => Some(Route::Login),
            Self::RedirectToOnboarding => Some(Route::Onboarding),
            Self::RedirectToHome => Some(Route::Home),
        }
    }

    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Evaluate the guard for `destination` under `state`.
#[must_use]
pub const fn evaluate(state: GuardState, destination: Destination) -> GuardOutcome {
    match destination {
        Destination::Public => {
            if state.is_authenticated {
                GuardOutcome::RedirectToHome
            } else {
                GuardOutcome::Allow
            }
        }
        Destination::Onboarding => {
            if !state.is_authenticated {
                GuardOutcome::RedirectToLogin
            } else if !state.needs_onboarding {
                GuardOutcome::RedirectToHome
            } else {
                GuardOutcome::Allow
            }
        }
        Destination::Protected => {
            if !state.is_authenticated {
                GuardOutcome::RedirectToLogin
            } else if state.needs_onboarding {
                GuardOutcome::RedirectToOnboarding
            } else {
                GuardOutcome::Allow
            }
        }
    }
}

/// Convenience wrapper evaluating a concrete route.
#[must_use]
pub fn evaluate_route(state: GuardState, route: &Route) -> GuardOutcome {
    evaluate(state, route.destination())
}

/// Follow redirects from `route` until the guard allows the current route,
/// giving up after [`MAX_REDIRECTS`] hops.
#[must_use]
pub fn resolve(state: GuardState, route: Route) -> Route {
    let mut current = route;
    for _ in 0..MAX_REDIRECTS {
        match evaluate_route(state, &current).redirect_target() {
            Some(target) => current = target,
            None => break,
        }
    }
    current
}
