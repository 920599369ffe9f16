//! Wire DTOs for the Shelve REST gateway.
//!
//! DESIGN
//! ======
//! Field names follow the backend's camelCase JSON contract. `UserSummary`
//! doubles as the persisted `user` record, so changing its serde shape
//! invalidates sessions saved by earlier builds (they restore as logged-out).

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Successful result of `POST /api/auth/login` or `POST /api/auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// Backend user identifier.
    pub user_id: String,
    pub email: String,
    /// Display name.
    pub name: String,
    /// True the first time this account authenticates.
    pub first_login: bool,
    /// Whether the account has finished the onboarding flow.
    pub onboarding_complete: bool,
}

/// Identity of the signed-in user as held by the session store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub name: String,
    pub onboarding_complete: bool,
}

impl UserSummary {
    /// Apply every field present in `patch`, leaving the rest untouched.
    #[must_use]
    pub fn merged(&self, patch: &UserPatch) -> Self {
        Self {
            id: patch.id.clone().unwrap_or_else(|| self.id.clone()),
            email: patch.email.clone().unwrap_or_else(|| self.email.clone()),
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            onboarding_complete: patch.onboarding_complete.unwrap_or(self.onboarding_complete),
        }
    }
}

impl From<&AuthResponse> for UserSummary {
    fn from(response: &AuthResponse) -> Self {
        Self {
            id: response.user_id.clone(),
            email: response.email.clone(),
            name: response.name.clone(),
            onboarding_complete: response.onboarding_complete,
        }
    }
}

/// Partial update for [`UserSummary`]; `None` means "keep current value".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding_complete: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body of `PUT /api/users/profile`. Absent fields are not sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Body of `POST /api/ratings/initial`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialLikedBooksRequest {
    pub book_ids: Vec<String>,
}

/// Account profile as returned by `GET /api/users/profile`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub onboarding_complete: bool,
}

/// A catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// Mean score across all ratings, if any exist.
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub ratings_count: Option<u64>,
}

/// One page of a paginated listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub last: bool,
}

impl<T> Default for Page<T> {
    /// An empty final page.
    fn default() -> Self {
        Self { content: Vec::new(), page: 0, size: 0, total_elements: 0, total_pages: 0, last: true }
    }
}

/// Reading shelf a book can be assigned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShelfStatus {
    ToRead,
    Reading,
    Read,
}

impl ShelfStatus {
    /// Path segment used by the shelf endpoints.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToRead => "TO_READ",
            Self::Reading => "READING",
            Self::Read => "READ",
        }
    }
}

/// Error parsing a [`ShelfStatus`] from user input.
#[derive(Debug, thiserror::Error)]
#[error("unknown shelf {0:?} (expected to-read, reading or read)")]
pub struct ParseShelfStatusError(String);

impl std::str::FromStr for ShelfStatus {
    type Err = ParseShelfStatusError;

    /// Accepts the wire names and their kebab/lower-case spellings.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "TO_READ" | "TOREAD" => Ok(Self::ToRead),
            "READING" => Ok(Self::Reading),
            "READ" => Ok(Self::Read),
            _ => Err(ParseShelfStatusError(raw.to_owned())),
        }
    }
}

/// A book placed on one of the user's shelves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfItem {
    pub id: String,
    pub book_id: String,
    #[serde(default)]
    pub book: Option<Book>,
    pub shelf_type: ShelfStatus,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
    #[serde(default)]
    pub added_at: Option<String>,
}

/// Body of `GET /api/shelves`: every shelf at once.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelvesResponse {
    #[serde(default)]
    pub reading: Vec<ShelfItem>,
    #[serde(default)]
    pub read: Vec<ShelfItem>,
    #[serde(default)]
    pub to_read: Vec<ShelfItem>,
}

impl ShelvesResponse {
    /// Flatten into one list: reading, then read, then to-read.
    #[must_use]
    pub fn into_items(self) -> Vec<ShelfItem> {
        let mut items = self.reading;
        items.extend(self.read);
        items.extend(self.to_read);
        items
    }
}

/// Body of `PUT /api/shelves/books/{bookId}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveBookRequest {
    pub target_shelf: ShelfStatus,
}

/// A user's star rating for one book.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: String,
    pub user_id: String,
    pub book_id: String,
    /// 1 to 5.
    pub score: u8,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /api/ratings`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRatingRequest {
    pub book_id: String,
    pub score: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    pub book_id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `POST /api/reviews`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub book_id: String,
    pub content: String,
}

/// Body of `PUT /api/reviews/{reviewId}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReviewRequest {
    pub content: String,
}

/// Review listings arrive paged from the service but some deployments
/// return a bare array.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReviewListing {
    Paged(Page<Review>),
    Plain(Vec<Review>),
}

impl ReviewListing {
    #[must_use]
    pub fn into_reviews(self) -> Vec<Review> {
        match self {
            Self::Paged(page) => page.content,
            Self::Plain(reviews) => reviews,
        }
    }
}

/// One scored suggestion from the recommendation engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub book_id: String,
    pub score: f64,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Body of `GET /api/recommendations`. Carries book ids only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub generated_at: Option<String>,
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
