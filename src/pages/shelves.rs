//! My Shelves page controller.

use super::{PageError, expire_on_unauthorized, require_field, require_route, require_token};
use crate::net::api::ShelveApi;
use crate::net::types::{ShelfItem, ShelfStatus};
use crate::routes::Route;
use crate::state::session::SessionStore;

/// Every shelved book, reading first, then read, then to-read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShelfOverview {
    pub items: Vec<ShelfItem>,
}

impl ShelfOverview {
    /// Items on `shelf`, or all items for `None`.
    #[must_use]
    pub fn filtered(&self, shelf: Option<ShelfStatus>) -> Vec<&ShelfItem> {
        self.items.iter().filter(|item| shelf.is_none_or(|s| item.shelf_type == s)).collect()
    }

    #[must_use]
    pub fn count(&self, shelf: Option<ShelfStatus>) -> usize {
        self.filtered(shelf).len()
    }
}

/// Load all shelves.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] unless the shelves page is reachable, or
/// the gateway error.
pub async fn load(api: &dyn ShelveApi, store: &SessionStore) -> Result<ShelfOverview, PageError> {
    require_route(store, Route::Shelves)?;
    let token = require_token(store)?;
    let shelves = api.my_shelves(&token).await.map_err(|e| expire_on_unauthorized(store, e))?;
    Ok(ShelfOverview { items: shelves.into_items() })
}

/// Move a shelved book to `shelf`.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] unless the shelves page is reachable, a
/// validation error for a blank id, or the gateway error.
pub async fn move_book(
    api: &dyn ShelveApi,
    store: &SessionStore,
    book_id: &str,
    shelf: ShelfStatus,
) -> Result<ShelfItem, PageError> {
    require_route(store, Route::Shelves)?;
    require_field(book_id, "book id")?;
    let token = require_token(store)?;
    let item = api
        .move_book(&token, book_id.trim(), shelf)
        .await
        .map_err(|e| expire_on_unauthorized(store, e))?;
    tracing::info!(book_id = %item.book_id, shelf = shelf.as_str(), "book moved");
    Ok(item)
}

/// Take a book off whatever shelf it is on.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] unless the shelves page is reachable, a
/// validation error for a blank id, or the gateway error.
pub async fn remove_book(api: &dyn ShelveApi, store: &SessionStore, book_id: &str) -> Result<(), PageError> {
    require_route(store, Route::Shelves)?;
    require_field(book_id, "book id")?;
    let token = require_token(store)?;
    api.remove_from_shelf(&token, book_id.trim())
        .await
        .map_err(|e| expire_on_unauthorized(store, e))?;
    tracing::info!(book_id = %book_id.trim(), "book removed from shelf");
    Ok(())
}

#[cfg(test)]
#[path = "shelves_test.rs"]
mod shelves_test;
