//! Book detail page controller: one book with its ratings, reviews and the
//! caller's shelf entry.
//!
//! Every action is guarded by the book's own route, so a session that must
//! finish onboarding cannot rate or review from a deep link.

use super::{PageError, best_effort, expire_on_unauthorized, require_route, require_token};
use crate::net::api::ShelveApi;
use crate::net::types::{Book, Rating, Review, ShelfItem, ShelfStatus};
use crate::routes::Route;
use crate::state::session::SessionStore;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;
/// Review length bounds, in characters after trimming.
pub const MIN_REVIEW_LEN: usize = 10;
pub const MAX_REVIEW_LEN: usize = 5000;

#[derive(Clone, Debug, PartialEq)]
pub struct BookDetail {
    pub book: Book,
    pub average_rating: Option<f64>,
    pub my_rating: Option<Rating>,
    pub shelf_item: Option<ShelfItem>,
    pub reviews: Vec<Review>,
}

fn page_for(book_id: &str) -> Route {
    Route::Book(book_id.trim().to_owned())
}

/// Load the book and its secondary sections concurrently.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] unless the page is reachable, or the
/// gateway error if the book itself cannot be loaded. Secondary sections
/// degrade to empty.
pub async fn load(api: &dyn ShelveApi, store: &SessionStore, book_id: &str) -> Result<BookDetail, PageError> {
    require_route(store, page_for(book_id))?;
    let token = require_token(store)?;
    let book_id = book_id.trim();

    let (book, average, mine, shelf, reviews) = futures::join!(
        api.book(book_id),
        api.average_rating(&token, book_id),
        api.user_rating(&token, book_id),
        api.shelf_item(&token, book_id),
        api.book_reviews(&token, book_id),
    );

    let book = book?;
    Ok(BookDetail {
        book,
        average_rating: best_effort(store, "average_rating", average.map(Some))?,
        my_rating: best_effort(store, "my_rating", mine)?,
        shelf_item: best_effort(store, "shelf_item", shelf)?,
        reviews: best_effort(store, "reviews", reviews)?,
    })
}

pub(crate) fn validate_score(score: u8) -> Result<(), PageError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(PageError::Validation(format!("Rating must be between {MIN_SCORE} and {MAX_SCORE}")));
    }
    Ok(())
}

/// Trimmed review text within the length bounds.
pub(crate) fn validate_review(content: &str) -> Result<&str, PageError> {
    let content = content.trim();
    let len = content.chars().count();
    if len < MIN_REVIEW_LEN {
        return Err(PageError::Validation(format!("Review must be at least {MIN_REVIEW_LEN} characters")));
    }
    if len > MAX_REVIEW_LEN {
        return Err(PageError::Validation(format!("Review must be at most {MAX_REVIEW_LEN} characters")));
    }
    Ok(content)
}

/// Rate the book 1 to 5 stars.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] unless the page is reachable, a
/// validation error for an out-of-range score, or the gateway error.
pub async fn rate(api: &dyn ShelveApi, store: &SessionStore, book_id: &str, score: u8) -> Result<Rating, PageError> {
    require_route(store, page_for(book_id))?;
    validate_score(score)?;
    let token = require_token(store)?;
    api.rate_book(&token, book_id.trim(), score)
        .await
        .map_err(|e| expire_on_unauthorized(store, e))
}

/// Put the book on `shelf`: moves an existing entry, adds a new one, and
/// does nothing if it is already there.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] unless the page is reachable, or the
/// gateway error.
pub async fn shelve(
    api: &dyn ShelveApi,
    store: &SessionStore,
    book_id: &str,
    shelf: ShelfStatus,
) -> Result<ShelfItem, PageError> {
    require_route(store, page_for(book_id))?;
    let token = require_token(store)?;
    let book_id = book_id.trim();
    let current = api.shelf_item(&token, book_id).await.map_err(|e| expire_on_unauthorized(store, e))?;
    let result = match current {
        Some(item) if item.shelf_type == shelf => return Ok(item),
        Some(_) => api.move_book(&token, book_id, shelf).await,
        None => api.add_to_shelf(&token, book_id, shelf).await,
    };
    result.map_err(|e| expire_on_unauthorized(store, e))
}

/// Publish a review of the book.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] unless the page is reachable, a
/// validation error for text outside the length bounds, or the gateway error.
pub async fn submit_review(
    api: &dyn ShelveApi,
    store: &SessionStore,
    book_id: &str,
    content: &str,
) -> Result<Review, PageError> {
    require_route(store, page_for(book_id))?;
    let content = validate_review(content)?;
    let token = require_token(store)?;
    api.create_review(&token, book_id.trim(), content)
        .await
        .map_err(|e| expire_on_unauthorized(store, e))
}

/// Replace the text of one of the caller's reviews on this book.
///
/// # Errors
///
/// Same as [`submit_review`].
pub async fn edit_review(
    api: &dyn ShelveApi,
    store: &SessionStore,
    book_id: &str,
    review_id: &str,
    content: &str,
) -> Result<Review, PageError> {
    require_route(store, page_for(book_id))?;
    let content = validate_review(content)?;
    let token = require_token(store)?;
    api.update_review(&token, review_id.trim(), content)
        .await
        .map_err(|e| expire_on_unauthorized(store, e))
}

/// # Errors
///
/// Returns [`PageError::Redirect`] unless the page is reachable, or the
/// gateway error.
pub async fn delete_review(
    api: &dyn ShelveApi,
    store: &SessionStore,
    book_id: &str,
    review_id: &str,
) -> Result<(), PageError> {
    require_route(store, page_for(book_id))?;
    let token = require_token(store)?;
    api.delete_review(&token, review_id.trim())
        .await
        .map_err(|e| expire_on_unauthorized(store, e))
}

#[cfg(test)]
#[path = "book_test.rs"]
mod book_test;
