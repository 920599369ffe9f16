use std::sync::Arc;

use super::*;
use crate::net::api::test_helpers::{MockApi, book};
use crate::net::types::AuthResponse;
use crate::util::persistence::MemoryStorage;

fn pending_store() -> SessionStore {
    let store = SessionStore::open(Arc::new(MemoryStorage::new()));
    store.set_auth(&AuthResponse {
        token: "tok".into(),
        user_id: "u1".into(),
        email: "ada@example.com".into(),
        name: "Ada".into(),
        first_login: true,
        onboarding_complete: false,
    });
    store
}

fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| (*s).to_owned()).collect()
}

// =============================================================
// normalize_selection
// =============================================================

#[test]
fn normalize_selection_dedups_and_drops_blanks() {
    let selection = normalize_selection(&ids(&["b1", " b2 ", "b1", "", "b3"]));
    assert_eq!(selection, ids(&["b1", "b2", "b3"]));
}

// =============================================================
// suggested_books
// =============================================================

#[tokio::test]
async fn suggested_books_requests_first_page_of_twenty() {
    let api = MockApi::default();
    *api.books.lock().unwrap() = vec![book("b1"), book("b2")];
    let books = suggested_books(&api, &pending_store()).await.unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(api.calls(), vec!["top_rated:0:20".to_owned()]);
}

// =============================================================
// submit_selection
// =============================================================

#[tokio::test]
async fn submit_selection_completes_onboarding() {
    let api = MockApi::default();
    let store = pending_store();
    let route = submit_selection(&api, &store, &ids(&["b1", "b2", "b3"])).await.unwrap();
    assert_eq!(route, Route::Home);
    assert!(!store.needs_onboarding());
    assert!(store.user().unwrap().onboarding_complete);

    let calls = api.calls();
    assert_eq!(calls.first().map(String::as_str), Some("initial_liked:b1,b2,b3"));
    assert_eq!(calls.last().map(String::as_str), Some("complete_onboarding"));
    for id in ["b1", "b2", "b3"] {
        assert!(calls.contains(&format!("shelf:READ:{id}")), "missing shelf call for {id}");
    }
}

#[tokio::test]
async fn submit_selection_requires_three_distinct_books() {
    let api = MockApi::default();
    let store = pending_store();
    let err = submit_selection(&api, &store, &ids(&["b1", "b1", "b2"])).await.unwrap_err();
    assert!(matches!(err, PageError::Validation(_)));
    assert!(api.calls().is_empty());
    assert!(store.needs_onboarding());
}

#[tokio::test]
async fn submit_selection_tolerates_shelf_failures() {
    let api = MockApi::default();
    api.failing_shelf_books.lock().unwrap().insert("b2".into());
    let store = pending_store();
    submit_selection(&api, &store, &ids(&["b1", "b2", "b3"])).await.unwrap();
    assert!(!store.needs_onboarding());
}

#[tokio::test]
async fn submit_selection_without_session_redirects_to_login() {
    let api = MockApi::default();
    let store = SessionStore::open(Arc::new(MemoryStorage::new()));
    let err = submit_selection(&api, &store, &ids(&["b1", "b2", "b3"])).await.unwrap_err();
    assert!(matches!(err, PageError::Redirect(Route::Login)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn expired_token_during_onboarding_logs_out() {
    let api = MockApi::default();
    *api.auth_failure_status.lock().unwrap() = Some(401);
    let store = pending_store();
    let err = submit_selection(&api, &store, &ids(&["b1", "b2", "b3"])).await.unwrap_err();
    assert!(matches!(err, PageError::Api(crate::net::api::ApiError::Unauthorized)));
    assert_eq!(store.snapshot(), crate::state::session::Session::default());
}

// =============================================================
// skip
// =============================================================

#[tokio::test]
async fn skip_completes_without_selection() {
    let api = MockApi::default();
    let store = pending_store();
    assert_eq!(skip(&api, &store).await.unwrap(), Route::Home);
    assert_eq!(api.calls(), vec!["complete_onboarding".to_owned()]);
    assert!(!store.needs_onboarding());
}

#[tokio::test]
async fn failed_completion_keeps_onboarding_pending() {
    let api = MockApi::default();
    *api.auth_failure_status.lock().unwrap() = Some(500);
    let store = pending_store();
    assert!(skip(&api, &store).await.is_err());
    assert!(store.is_authenticated());
    assert!(store.needs_onboarding());
}

fn onboarded_store() -> SessionStore {
    let store = SessionStore::open(Arc::new(MemoryStorage::new()));
    store.set_auth(&AuthResponse {
        token: "tok".into(),
        user_id: "u1".into(),
        email: "ada@example.com".into(),
        name: "Ada".into(),
        first_login: false,
        onboarding_complete: true,
    });
    store
}

#[tokio::test]
async fn finished_onboarding_refuses_every_entry_point() {
    let api = MockApi::default();
    let store = onboarded_store();
    assert!(matches!(skip(&api, &store).await, Err(PageError::Redirect(Route::Home))));
    assert!(matches!(
        submit_selection(&api, &store, &ids(&["b1", "b2", "b3"])).await,
        Err(PageError::Redirect(Route::Home))
    ));
    assert!(matches!(suggested_books(&api, &store).await, Err(PageError::Redirect(Route::Home))));
    assert!(api.calls().is_empty());
}
