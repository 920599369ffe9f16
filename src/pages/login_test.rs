use std::sync::Arc;

use super::*;
use crate::net::api::test_helpers::MockApi;
use crate::net::types::AuthResponse;
use crate::util::persistence::MemoryStorage;

fn auth(first_login: bool, onboarding_complete: bool) -> AuthResponse {
    AuthResponse {
        token: "tok-login".into(),
        user_id: "u1".into(),
        email: "ada@example.com".into(),
        name: "Ada".into(),
        first_login,
        onboarding_complete,
    }
}

fn form() -> LoginForm {
    LoginForm { email: "  ada@example.com ".into(), password: "secret".into() }
}

#[tokio::test]
async fn login_lands_home_for_onboarded_user() {
    let api = MockApi::with_auth(auth(false, true));
    let store = SessionStore::open(Arc::new(MemoryStorage::new()));
    let route = submit(&api, &store, &form()).await.unwrap();
    assert_eq!(route, Route::Home);
    assert!(store.is_authenticated());
    assert_eq!(store.token().as_deref(), Some("tok-login"));
}

#[tokio::test]
async fn login_lands_on_onboarding_when_pending() {
    let api = MockApi::with_auth(auth(false, false));
    let store = SessionStore::open(Arc::new(MemoryStorage::new()));
    assert_eq!(submit(&api, &store, &form()).await.unwrap(), Route::Onboarding);
    assert!(store.needs_onboarding());
}

#[tokio::test]
async fn login_trims_email() {
    let api = MockApi::with_auth(auth(false, true));
    let store = SessionStore::open(Arc::new(MemoryStorage::new()));
    submit(&api, &store, &form()).await.unwrap();
    assert_eq!(api.calls(), vec!["login:ada@example.com".to_owned()]);
}

#[tokio::test]
async fn blank_password_is_rejected_without_request() {
    let api = MockApi::with_auth(auth(false, true));
    let store = SessionStore::open(Arc::new(MemoryStorage::new()));
    let bad = LoginForm { email: "ada@example.com".into(), password: String::new() };
    assert!(matches!(submit(&api, &store, &bad).await, Err(PageError::Validation(_))));
    assert!(api.calls().is_empty());
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn rejected_credentials_leave_store_untouched() {
    let api = MockApi::default();
    let store = SessionStore::open(Arc::new(MemoryStorage::new()));
    let err = submit(&api, &store, &form()).await.unwrap_err();
    assert!(matches!(err, PageError::Api(_)));
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn login_with_live_session_is_refused() {
    let api = MockApi::with_auth(auth(false, true));
    let store = SessionStore::open(Arc::new(MemoryStorage::new()));
    submit(&api, &store, &form()).await.unwrap();

    *api.auth.lock().unwrap() = Some(AuthResponse { user_id: "other".into(), ..auth(true, false) });
    let err = submit(&api, &store, &form()).await.unwrap_err();
    assert!(matches!(err, PageError::Redirect(Route::Home)));
    assert_eq!(store.user().unwrap().id, "u1");
    assert_eq!(api.calls().len(), 1);
}
