use std::sync::Arc;

use super::*;
use crate::net::api::test_helpers::{MockApi, book};
use crate::net::types::{AuthResponse, Recommendation};
use crate::util::persistence::MemoryStorage;

fn store_with(onboarding_complete: bool) -> SessionStore {
    let store = SessionStore::open(Arc::new(MemoryStorage::new()));
    store.set_auth(&AuthResponse {
        token: "tok".into(),
        user_id: "u1".into(),
        email: "ada@example.com".into(),
        name: "Ada".into(),
        first_login: !onboarding_complete,
        onboarding_complete,
    });
    store
}

fn signed_in_store() -> SessionStore {
    store_with(true)
}

fn catalog() -> MockApi {
    let mut dune = book("b1");
    dune.title = "Dune".into();
    dune.genre = Some("Science Fiction".into());
    let mut emma = book("b2");
    emma.title = "Emma".into();
    emma.genre = Some("Romance".into());
    let mut messiah = book("b3");
    messiah.title = "Dune Messiah".into();
    messiah.genre = Some("Science Fiction".into());
    MockApi::with_books(vec![dune, emma, messiah])
}

fn rec(book_id: &str, reason: Option<&str>) -> Recommendation {
    Recommendation { book_id: book_id.into(), score: 0.9, reason: reason.map(str::to_owned) }
}

fn titles(listing: &Listing) -> Vec<String> {
    match listing {
        Listing::Books(page) => page.content.iter().map(|b| b.title.clone()).collect(),
        Listing::Recommended(books) => books.iter().map(|r| r.book.title.clone()).collect(),
    }
}

#[test]
fn tab_names_parse() {
    assert_eq!("all".parse::<DiscoverTab>().unwrap(), DiscoverTab::All);
    assert_eq!(" Recommended ".parse::<DiscoverTab>().unwrap(), DiscoverTab::Recommended);
    assert_eq!("top-rated".parse::<DiscoverTab>().unwrap(), DiscoverTab::TopRated);
    assert_eq!("top_rated".parse::<DiscoverTab>().unwrap(), DiscoverTab::TopRated);
    assert_eq!("recent".parse::<DiscoverTab>().unwrap(), DiscoverTab::Recent);
    assert!("popular".parse::<DiscoverTab>().is_err());
}

#[test]
fn search_wins_over_genre() {
    let query = DiscoverQuery {
        search: Some("  dune ".into()),
        genre: Some("Romance".into()),
        ..DiscoverQuery::default()
    };
    assert_eq!(catalog_filter(&query), CatalogFilter::Search("dune"));
}

#[test]
fn blank_search_and_all_genre_mean_everything() {
    let query = DiscoverQuery { search: Some("   ".into()), genre: Some("All".into()), ..DiscoverQuery::default() };
    assert_eq!(catalog_filter(&query), CatalogFilter::Everything);
    let query = DiscoverQuery { search: Some(String::new()), genre: Some("Fantasy".into()), ..DiscoverQuery::default() };
    assert_eq!(catalog_filter(&query), CatalogFilter::Genre("Fantasy"));
}

#[tokio::test]
async fn all_tab_lists_the_catalog() {
    let api = catalog();
    let listing = browse(&api, &signed_in_store(), &DiscoverQuery { page: 2, ..DiscoverQuery::default() })
        .await
        .unwrap();
    assert_eq!(titles(&listing), vec!["Dune", "Emma", "Dune Messiah"]);
    assert_eq!(api.calls(), vec![format!("list_books:2:{PAGE_SIZE}")]);
}

#[tokio::test]
async fn all_tab_searches_titles() {
    let api = catalog();
    let query = DiscoverQuery { search: Some("dune".into()), ..DiscoverQuery::default() };
    let listing = browse(&api, &signed_in_store(), &query).await.unwrap();
    assert_eq!(titles(&listing), vec!["Dune", "Dune Messiah"]);
    assert_eq!(api.calls(), vec![format!("search:dune:0:{PAGE_SIZE}")]);
}

#[tokio::test]
async fn all_tab_filters_by_genre() {
    let api = catalog();
    let query = DiscoverQuery { genre: Some("Romance".into()), ..DiscoverQuery::default() };
    let listing = browse(&api, &signed_in_store(), &query).await.unwrap();
    assert_eq!(titles(&listing), vec!["Emma"]);
    assert_eq!(api.calls(), vec![format!("genre:Romance:0:{PAGE_SIZE}")]);
}

#[tokio::test]
async fn fixed_tabs_ignore_filters() {
    let api = catalog();
    let store = signed_in_store();
    let query = DiscoverQuery { tab: DiscoverTab::TopRated, search: Some("dune".into()), ..DiscoverQuery::default() };
    browse(&api, &store, &query).await.unwrap();
    let query = DiscoverQuery { tab: DiscoverTab::Recent, page: 1, ..DiscoverQuery::default() };
    browse(&api, &store, &query).await.unwrap();
    assert_eq!(api.calls(), vec![format!("top_rated:0:{PAGE_SIZE}"), format!("recent:1:{PAGE_SIZE}")]);
}

#[tokio::test]
async fn recommendations_keep_engine_order_and_reasons() {
    let api = catalog();
    *api.recommendations.lock().unwrap() =
        vec![rec("b3", Some("Because you liked Dune")), rec("gone", None), rec("b1", None)];
    let query = DiscoverQuery { tab: DiscoverTab::Recommended, ..DiscoverQuery::default() };
    let Listing::Recommended(books) = browse(&api, &signed_in_store(), &query).await.unwrap() else {
        panic!("expected recommendations");
    };
    let ids: Vec<&str> = books.iter().map(|r| r.book.id.as_str()).collect();
    assert_eq!(ids, vec!["b3", "b1"]);
    assert_eq!(books[0].reason.as_deref(), Some("Because you liked Dune"));
    assert_eq!(books[1].reason, None);
    assert_eq!(api.calls(), vec![format!("recommendations:{PAGE_SIZE}"), "batch:b3,gone,b1".to_owned()]);
}

#[tokio::test]
async fn empty_recommendations_skip_the_batch_lookup() {
    let api = catalog();
    let store = signed_in_store();
    assert!(recommended_books(&api, &store, "tok", 5).await.unwrap().is_empty());
    assert_eq!(api.calls(), vec!["recommendations:5".to_owned()]);
}

#[tokio::test]
async fn failing_recommendation_engine_yields_nothing() {
    let api = catalog();
    *api.recommendations.lock().unwrap() = vec![rec("b1", None)];
    api.fail("batch");
    let store = signed_in_store();
    assert!(recommended_books(&api, &store, "tok", 5).await.unwrap().is_empty());
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn rejected_token_on_recommendations_logs_out() {
    let api = catalog();
    *api.auth_failure_status.lock().unwrap() = Some(401);
    let store = signed_in_store();
    let query = DiscoverQuery { tab: DiscoverTab::Recommended, ..DiscoverQuery::default() };
    let err = browse(&api, &store, &query).await.unwrap_err();
    assert!(matches!(err, PageError::Api(ApiError::Unauthorized)));
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn catalog_failure_is_returned() {
    let api = catalog();
    api.fail("list_books");
    let err = browse(&api, &signed_in_store(), &DiscoverQuery::default()).await.unwrap_err();
    assert!(matches!(err, PageError::Api(ApiError::Response { status: 500, .. })));
}

#[tokio::test]
async fn genres_come_from_the_catalog() {
    let api = catalog();
    assert_eq!(genres(&api, &signed_in_store()).await.unwrap(), vec!["Romance", "Science Fiction"]);
}

#[tokio::test]
async fn discover_waits_for_onboarding_and_a_session() {
    let api = catalog();
    let pending = store_with(false);
    let err = browse(&api, &pending, &DiscoverQuery::default()).await.unwrap_err();
    assert!(matches!(err, PageError::Redirect(Route::Onboarding)));

    let logged_out = SessionStore::open(Arc::new(MemoryStorage::new()));
    let err = genres(&api, &logged_out).await.unwrap_err();
    assert!(matches!(err, PageError::Redirect(Route::Login)));
    assert!(api.calls().is_empty());
}
