use std::sync::Arc;

use super::*;
use crate::net::types::AuthResponse;
use crate::util::persistence::MemoryStorage;

fn signed_in_store() -> SessionStore {
    let store = SessionStore::open(Arc::new(MemoryStorage::new()));
    store.set_auth(&AuthResponse {
        token: "tok".into(),
        user_id: "u1".into(),
        email: "a@b.c".into(),
        name: "Ada".into(),
        first_login: false,
        onboarding_complete: true,
    });
    store
}

#[test]
fn require_token_without_session_is_not_authenticated() {
    let store = SessionStore::open(Arc::new(MemoryStorage::new()));
    assert!(matches!(require_token(&store), Err(PageError::NotAuthenticated)));
}

#[test]
fn require_token_returns_bearer() {
    assert_eq!(require_token(&signed_in_store()).unwrap(), "tok");
}

#[test]
fn unauthorized_expires_session() {
    let store = signed_in_store();
    let err = expire_on_unauthorized(&store, ApiError::Unauthorized);
    assert!(matches!(err, PageError::Api(ApiError::Unauthorized)));
    assert!(!store.is_authenticated());
}

#[test]
fn other_errors_keep_session() {
    let store = signed_in_store();
    let err = expire_on_unauthorized(&store, ApiError::Response { status: 500, message: "boom".into() });
    assert!(matches!(err, PageError::Api(ApiError::Response { status: 500, .. })));
    assert!(store.is_authenticated());
}

#[test]
fn require_field_rejects_whitespace() {
    match require_field("   ", "email") {
        Err(PageError::Validation(msg)) => assert_eq!(msg, "email is required"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(require_field("x", "email").is_ok());
}

#[test]
fn require_route_allows_reachable_page() {
    assert!(require_route(&signed_in_store(), Route::Profile).is_ok());
}

#[test]
fn require_route_carries_settled_redirect_target() {
    let logged_out = SessionStore::open(Arc::new(MemoryStorage::new()));
    assert!(matches!(require_route(&logged_out, Route::Shelves), Err(PageError::Redirect(Route::Login))));

    let pending = SessionStore::open(Arc::new(MemoryStorage::new()));
    pending.set_auth(&AuthResponse {
        token: "tok".into(),
        user_id: "u1".into(),
        email: "a@b.c".into(),
        name: "Ada".into(),
        first_login: true,
        onboarding_complete: false,
    });
    assert!(matches!(require_route(&pending, Route::Login), Err(PageError::Redirect(Route::Onboarding))));
}

#[test]
fn best_effort_defaults_failed_sections() {
    let store = signed_in_store();
    let ok: Result<Vec<u8>, ApiError> = Ok(vec![1]);
    assert_eq!(best_effort(&store, "s", ok).unwrap(), vec![1]);
    let failed: Result<Vec<u8>, ApiError> = Err(ApiError::Response { status: 503, message: "down".into() });
    assert!(best_effort(&store, "s", failed).unwrap().is_empty());
    assert!(store.is_authenticated());
}

#[test]
fn best_effort_still_expires_on_unauthorized() {
    let store = signed_in_store();
    let rejected: Result<Vec<u8>, ApiError> = Err(ApiError::Unauthorized);
    assert!(matches!(best_effort(&store, "s", rejected), Err(PageError::Api(ApiError::Unauthorized))));
    assert!(!store.is_authenticated());
}
