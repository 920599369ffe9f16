use super::*;

fn state(is_authenticated: bool, needs_onboarding: bool) -> GuardState {
    GuardState { is_authenticated, needs_onboarding }
}

// =============================================================
// Scenarios
// =============================================================

#[test]
fn unauthenticated_protected_redirects_to_login() {
    assert_eq!(evaluate(state(false, false), Destination::Protected), GuardOutcome::RedirectToLogin);
}

#[test]
fn pending_onboarding_protected_redirects_to_onboarding() {
    assert_eq!(evaluate(state(true, true), Destination::Protected), GuardOutcome::RedirectToOnboarding);
}

#[test]
fn pending_onboarding_onboarding_is_allowed() {
    assert_eq!(evaluate(state(true, true), Destination::Onboarding), GuardOutcome::Allow);
}

#[test]
fn authenticated_public_redirects_home() {
    assert_eq!(evaluate(state(true, false), Destination::Public), GuardOutcome::RedirectToHome);
    assert_eq!(evaluate_route(state(true, false), &Route::Login), GuardOutcome::RedirectToHome);
}

#[test]
fn finished_onboarding_cannot_revisit_onboarding() {
    assert_eq!(evaluate(state(true, false), Destination::Onboarding), GuardOutcome::RedirectToHome);
}

#[test]
fn unauthenticated_onboarding_redirects_to_login() {
    assert_eq!(evaluate(state(false, false), Destination::Onboarding), GuardOutcome::RedirectToLogin);
}

// =============================================================
// Full matrix
// =============================================================

#[test]
fn decision_matrix() {
    use GuardOutcome::*;
    let expected = [
        // (auth, onboarding, destination, outcome)
        (false, false, Destination::Public, Allow),
        (false, true, Destination::Public, Allow),
        (true, false, Destination::Public, RedirectToHome),
        (true, true, Destination::Public, RedirectToHome),
        (false, false, Destination::Onboarding, RedirectToLogin),
        (false, true, Destination::Onboarding, RedirectToLogin),
        (true, false, Destination::Onboarding, RedirectToHome),
        (true, true, Destination::Onboarding, Allow),
        (false, false, Destination::Protected, RedirectToLogin),
        (false, true, Destination::Protected, RedirectToLogin),
        (true, false, Destination::Protected, Allow),
        (true, true, Destination::Protected, RedirectToOnboarding),
    ];
    for (auth, onboarding, destination, outcome) in expected {
        assert_eq!(
            evaluate(state(auth, onboarding), destination),
            outcome,
            "auth={auth} onboarding={onboarding} destination={destination:?}"
        );
    }
}

fn sample_route(destination: Destination) -> Route {
    match destination {
        Destination::Public => Route::Login,
        Destination::Onboarding => Route::Onboarding,
        Destination::Protected => Route::Shelves,
    }
}

#[test]
fn every_redirect_chain_settles_on_an_allowed_route() {
    for auth in [false, true] {
        for onboarding in [false, true] {
            let s = state(auth, onboarding);
            for destination in Destination::ALL {
                let landed = resolve(s, sample_route(destination));
                assert!(evaluate_route(s, &landed).is_allowed(), "{s:?} {destination:?} -> {landed:?}");
            }
        }
    }
}

#[test]
fn pending_onboarding_public_route_takes_two_hops() {
    let s = state(true, true);
    assert_eq!(evaluate_route(s, &Route::Login), GuardOutcome::RedirectToHome);
    assert_eq!(evaluate_route(s, &Route::Home), GuardOutcome::RedirectToOnboarding);
    assert_eq!(resolve(s, Route::Login), Route::Onboarding);
    assert_eq!(resolve(s, Route::Register), Route::Onboarding);
}

#[test]
fn resolve_keeps_allowed_routes() {
    assert_eq!(resolve(state(true, false), Route::Book("7".into())), Route::Book("7".into()));
    assert_eq!(resolve(state(false, false), Route::Register), Route::Register);
}

#[test]
fn redirect_targets() {
    assert_eq!(GuardOutcome::Allow.redirect_target(), None);
    assert_eq!(GuardOutcome::RedirectToLogin.redirect_target(), Some(Route::Login));
    assert_eq!(GuardOutcome::RedirectToOnboarding.redirect_target(), Some(Route::Onboarding));
    assert_eq!(GuardOutcome::RedirectToHome.redirect_target(), Some(Route::Home));
}

#[test]
fn evaluate_is_usable_in_const_context() {
    const OUTCOME: GuardOutcome = evaluate(GuardState { is_authenticated: false, needs_onboarding: false }, Destination::Public);
    assert_eq!(OUTCOME, GuardOutcome::Allow);
}
