//! Discover page controller: catalog browsing, search and recommendations.
//!
//! The page has four tabs. "All" is the searchable catalog (free-text query
//! wins over a genre filter); the other three are fixed listings. Every tab
//! except "Recommended" is paged.

use std::collections::HashMap;
use std::str::FromStr;

use super::{PageError, expire_on_unauthorized, require_route, require_token};
use crate::net::api::{ApiError, ShelveApi};
use crate::net::types::{Book, Page};
use crate::routes::Route;
use crate::state::session::SessionStore;

/// Books per listing page.
pub const PAGE_SIZE: u32 = 20;

/// Genre filter offered by the page; `"All"` means no filter.
pub const GENRES: [&str; 13] = [
    "All",
    "Fiction",
    "Non-Fiction",
    "Science Fiction",
    "Fantasy",
    "Mystery",
    "Thriller",
    "Romance",
    "Historical",
    "Biography",
    "Self-Help",
    "Science",
    "Philosophy",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiscoverTab {
    #[default]
    All,
    Recommended,
    TopRated,
    Recent,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown tab {0:?} (expected all, recommended, top-rated or recent)")]
pub struct ParseTabError(String);

impl FromStr for DiscoverTab {
    type Err = ParseTabError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "recommended" => Ok(Self::Recommended),
            "top-rated" | "top_rated" => Ok(Self::TopRated),
            "recent" => Ok(Self::Recent),
            _ => Err(ParseTabError(raw.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiscoverQuery {
    pub tab: DiscoverTab,
    /// Free-text search; only used on the "All" tab.
    pub search: Option<String>,
    /// Genre filter; only used on the "All" tab without a search.
    pub genre: Option<String>,
    pub page: u32,
}

/// A recommended book with the engine's explanation.
#[derive(Clone, Debug, PartialEq)]
pub struct RecommendedBook {
    pub book: Book,
    pub reason: Option<String>,
}

/// What a tab shows.
#[derive(Clone, Debug, PartialEq)]
pub enum Listing {
    Books(Page<Book>),
    Recommended(Vec<RecommendedBook>),
}

/// How the "All" tab resolves its filters.
#[derive(Debug, PartialEq, Eq)]
enum CatalogFilter<'a> {
    Search(&'a str),
    Genre(&'a str),
    Everything,
}

fn catalog_filter(query: &DiscoverQuery) -> CatalogFilter<'_> {
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        return CatalogFilter::Search(search);
    }
    match query.genre.as_deref().map(str::trim) {
        Some(genre) if !genre.is_empty() && !genre.eq_ignore_ascii_case("all") => CatalogFilter::Genre(genre),
        _ => CatalogFilter::Everything,
    }
}

/// Load the listing for `query`.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] unless the discover page is reachable, or
/// the gateway error for catalog listings. Recommendation failures other
/// than an expired session yield an empty list.
pub async fn browse(api: &dyn ShelveApi, store: &SessionStore, query: &DiscoverQuery) -> Result<Listing, PageError> {
    require_route(store, Route::Discover)?;
    let page = query.page;
    let listing = match query.tab {
        DiscoverTab::All => match catalog_filter(query) {
            CatalogFilter::Search(search) => api.search_books(search, page, PAGE_SIZE).await?,
            CatalogFilter::Genre(genre) => api.books_by_genre(genre, page, PAGE_SIZE).await?,
            CatalogFilter::Everything => api.list_books(page, PAGE_SIZE).await?,
        },
        DiscoverTab::TopRated => api.top_rated_books(page, PAGE_SIZE).await?,
        DiscoverTab::Recent => api.recent_books(page, PAGE_SIZE).await?,
        DiscoverTab::Recommended => {
            let token = require_token(store)?;
            return Ok(Listing::Recommended(recommended_books(api, store, &token, PAGE_SIZE).await?));
        }
    };
    Ok(Listing::Books(listing))
}

/// Genres known to the catalog.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] unless the discover page is reachable, or
/// the gateway error.
pub async fn genres(api: &dyn ShelveApi, store: &SessionStore) -> Result<Vec<String>, PageError> {
    require_route(store, Route::Discover)?;
    Ok(api.genres().await?)
}

/// Up to `limit` recommended books, in the engine's ranking order.
///
/// The engine returns ids only; the books are then fetched in one batch.
/// Ids the catalog no longer knows are dropped.
///
/// # Errors
///
/// Only an expired session is an error (and logs the session out); any
/// other failure is logged and yields an empty list.
pub(crate) async fn recommended_books(
    api: &dyn ShelveApi,
    store: &SessionStore,
    token: &str,
    limit: u32,
) -> Result<Vec<RecommendedBook>, PageError> {
    match fetch_recommended(api, token, limit).await {
        Ok(books) => Ok(books),
        Err(ApiError::Unauthorized) => Err(expire_on_unauthorized(store, ApiError::Unauthorized)),
        Err(e) => {
            tracing::warn!(error = %e, "recommendations unavailable");
            Ok(Vec::new())
        }
    }
}

async fn fetch_recommended(api: &dyn ShelveApi, token: &str, limit: u32) -> Result<Vec<RecommendedBook>, ApiError> {
    let response = api.recommendations(token, limit).await?;
    if response.recommendations.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<String> = response.recommendations.iter().map(|r| r.book_id.clone()).collect();
    let mut by_id: HashMap<String, Book> = api
        .books_by_ids(&ids)
        .await?
        .into_iter()
        .map(|b| (b.id.clone(), b))
        .collect();
    Ok(response
        .recommendations
        .into_iter()
        .filter_map(|rec| by_id.remove(&rec.book_id).map(|book| RecommendedBook { book, reason: rec.reason }))
        .collect())
}

#[cfg(test)]
#[path = "discover_test.rs"]
mod discover_test;
