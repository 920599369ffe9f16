//! Onboarding page controller.
//!
//! New accounts pick a few books they already like; those seed the
//! recommendation engine as liked ratings and land on the `READ` shelf.
//! Skipping is allowed and just acknowledges completion. Every entry point
//! refuses once onboarding is done.

use std::collections::HashSet;

use futures::future::join_all;

use super::{PageError, expire_on_unauthorized, require_route, require_token};
use crate::net::api::ShelveApi;
use crate::net::types::{Book, ShelfStatus};
use crate::routes::Route;
use crate::state::session::SessionStore;

/// Fewest distinct books a selection may contain.
pub const MIN_SELECTED_BOOKS: usize = 3;
/// Number of suggestions offered.
pub const SUGGESTION_PAGE_SIZE: u32 = 20;

/// Top-rated books to choose from.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] outside a pending onboarding, or the
/// gateway error if the listing fails.
pub async fn suggested_books(api: &dyn ShelveApi, store: &SessionStore) -> Result<Vec<Book>, PageError> {
    require_route(store, Route::Onboarding)?;
    let page = api.top_rated_books(0, SUGGESTION_PAGE_SIZE).await?;
    Ok(page.content)
}

/// Drop blanks and duplicates, keeping first-seen order.
pub(crate) fn normalize_selection(book_ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    book_ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .map(str::to_owned)
        .collect()
}

/// Submit the selection, then finish onboarding.
///
/// Shelf inserts are best-effort: a book that is already shelved (or fails
/// for any other reason) does not abort the flow.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] outside a pending onboarding, a
/// validation error for fewer than [`MIN_SELECTED_BOOKS`] books, or the
/// gateway error from rating submission or completion.
pub async fn submit_selection(
    api: &dyn ShelveApi,
    store: &SessionStore,
    book_ids: &[String],
) -> Result<Route, PageError> {
    require_route(store, Route::Onboarding)?;
    let selection = normalize_selection(book_ids);
    if selection.len() < MIN_SELECTED_BOOKS {
        return Err(PageError::Validation(format!("Please select at least {MIN_SELECTED_BOOKS} books")));
    }
    let token = require_token(store)?;

    api.submit_initial_liked_books(&token, &selection)
        .await
        .map_err(|e| expire_on_unauthorized(store, e))?;

    let shelved = join_all(selection.iter().map(|id| api.add_to_shelf(&token, id, ShelfStatus::Read))).await;
    for (id, result) in selection.iter().zip(shelved) {
        if let Err(e) = result {
            tracing::warn!(book_id = %id, error = %e, "could not shelve onboarding book; continuing");
        }
    }

    finish(api, store, &token).await
}

/// Finish onboarding without picking books.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] outside a pending onboarding, or the
/// gateway error from completion.
pub async fn skip(api: &dyn ShelveApi, store: &SessionStore) -> Result<Route, PageError> {
    require_route(store, Route::Onboarding)?;
    let token = require_token(store)?;
    finish(api, store, &token).await
}

async fn finish(api: &dyn ShelveApi, store: &SessionStore, token: &str) -> Result<Route, PageError> {
    api.complete_onboarding(token)
        .await
        .map_err(|e| expire_on_unauthorized(store, e))?;
    store.complete_onboarding();
    Ok(Route::Home)
}

#[cfg(test)]
#[path = "onboarding_test.rs"]
mod onboarding_test;
