//! Home page controller: the signed-in dashboard.

use super::discover::{RecommendedBook, recommended_books};
use super::{PageError, best_effort, require_route, require_token};
use crate::net::api::ShelveApi;
use crate::net::types::{Book, ShelfItem, ShelfStatus};
use crate::routes::Route;
use crate::state::session::SessionStore;

/// Books shown per dashboard row.
pub const SECTION_SIZE: u32 = 10;
/// "Continue reading" shows at most this many books.
pub const CURRENTLY_READING_LIMIT: usize = 5;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dashboard {
    /// Display name for the greeting.
    pub greeting_name: Option<String>,
    pub currently_reading: Vec<ShelfItem>,
    pub recommended: Vec<RecommendedBook>,
    pub top_rated: Vec<Book>,
    pub recently_added: Vec<Book>,
}

/// Load every dashboard section concurrently. Sections fail independently.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] unless home is reachable, or the
/// unauthorized error (after logging out) if any section's token is rejected.
pub async fn load(api: &dyn ShelveApi, store: &SessionStore) -> Result<Dashboard, PageError> {
    require_route(store, Route::Home)?;
    let token = require_token(store)?;

    let (reading, recommended, top_rated, recent) = futures::join!(
        api.shelf(&token, ShelfStatus::Reading),
        recommended_books(api, store, &token, SECTION_SIZE),
        api.top_rated_books(0, SECTION_SIZE),
        api.recent_books(0, SECTION_SIZE),
    );

    let mut currently_reading = best_effort(store, "currently_reading", reading)?;
    currently_reading.truncate(CURRENTLY_READING_LIMIT);
    Ok(Dashboard {
        greeting_name: store.user().map(|u| u.name),
        currently_reading,
        recommended: recommended?,
        top_rated: best_effort(store, "top_rated", top_rated)?.content,
        recently_added: best_effort(store, "recently_added", recent)?.content,
    })
}

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;
