//! REST client for the Shelve API gateway.
//!
//! DESIGN
//! ======
//! [`ShelveApi`] is the seam page controllers depend on; [`HttpApi`] is the
//! `reqwest` implementation. Authenticated calls take the bearer token as an
//! argument so the client itself stays stateless.
//!
//! ERROR HANDLING
//! ==============
//! 401 maps to [`ApiError::Unauthorized`] so callers can expire the session;
//! the gateway answers every token problem with 401. Other non-2xx statuses,
//! 403 included, surface the backend's `message` field.
//! Nothing is retried.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{IntoUrl, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::types::{
    AuthResponse, Book, ChangePasswordRequest, CreateRatingRequest, CreateReviewRequest, ErrorBody,
    InitialLikedBooksRequest, LoginRequest, MoveBookRequest, Page, Rating, RecommendationResponse, RegisterRequest,
    Review, ReviewListing, ShelfItem, ShelfStatus, ShelvesResponse, UpdateProfileRequest, UpdateReviewRequest,
    UserProfile,
};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by gateway calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The gateway rejected the bearer token.
    #[error("not authorized (session expired or invalid)")]
    Unauthorized,

    /// Any other non-success status.
    #[error("server returned {status}: {message}")]
    Response { status: u16, message: String },

    /// A success body could not be decoded.
    #[error("response parse failed: {0}")]
    Parse(String),
}

// =============================================================================
// TRAIT
// =============================================================================

/// Operations the client needs from the gateway. Catalog reads under
/// `/api/books` are public; everything else carries the bearer token.
#[async_trait]
pub trait ShelveApi: Send + Sync {
    // --- auth and account ---

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    async fn profile(&self, token: &str) -> Result<UserProfile, ApiError>;

    async fn update_profile(&self, token: &str, request: &UpdateProfileRequest) -> Result<UserProfile, ApiError>;

    async fn change_password(&self, token: &str, request: &ChangePasswordRequest) -> Result<(), ApiError>;

    /// Acknowledge onboarding completion; success carries no payload.
    async fn complete_onboarding(&self, token: &str) -> Result<(), ApiError>;

    // --- catalog ---

    async fn list_books(&self, page: u32, size: u32) -> Result<Page<Book>, ApiError>;

    async fn book(&self, book_id: &str) -> Result<Book, ApiError>;

    async fn search_books(&self, query: &str, page: u32, size: u32) -> Result<Page<Book>, ApiError>;

    async fn books_by_genre(&self, genre: &str, page: u32, size: u32) -> Result<Page<Book>, ApiError>;

    async fn genres(&self) -> Result<Vec<String>, ApiError>;

    async fn top_rated_books(&self, page: u32, size: u32) -> Result<Page<Book>, ApiError>;

    async fn recent_books(&self, page: u32, size: u32) -> Result<Page<Book>, ApiError>;

    /// Fetch several books at once. Order is not guaranteed; unknown ids
    /// are skipped.
    async fn books_by_ids(&self, book_ids: &[String]) -> Result<Vec<Book>, ApiError>;

    // --- shelves ---

    async fn my_shelves(&self, token: &str) -> Result<ShelvesResponse, ApiError>;

    async fn shelf(&self, token: &str, status: ShelfStatus) -> Result<Vec<ShelfItem>, ApiError>;

    /// Shelf entry for one book; `None` when the book is on no shelf.
    async fn shelf_item(&self, token: &str, book_id: &str) -> Result<Option<ShelfItem>, ApiError>;

    async fn add_to_shelf(&self, token: &str, book_id: &str, status: ShelfStatus) -> Result<ShelfItem, ApiError>;

    /// Move an already shelved book to another shelf.
    async fn move_book(&self, token: &str, book_id: &str, status: ShelfStatus) -> Result<ShelfItem, ApiError>;

    async fn remove_from_shelf(&self, token: &str, book_id: &str) -> Result<(), ApiError>;

    // --- ratings and reviews ---

    /// Rate the given books as liked to seed recommendations.
    async fn submit_initial_liked_books(&self, token: &str, book_ids: &[String]) -> Result<(), ApiError>;

    async fn rate_book(&self, token: &str, book_id: &str, score: u8) -> Result<Rating, ApiError>;

    /// The caller's own rating; `None` when they have not rated the book.
    async fn user_rating(&self, token: &str, book_id: &str) -> Result<Option<Rating>, ApiError>;

    async fn user_ratings(&self, token: &str) -> Result<Vec<Rating>, ApiError>;

    async fn average_rating(&self, token: &str, book_id: &str) -> Result<f64, ApiError>;

    async fn book_reviews(&self, token: &str, book_id: &str) -> Result<Vec<Review>, ApiError>;

    async fn create_review(&self, token: &str, book_id: &str, content: &str) -> Result<Review, ApiError>;

    async fn update_review(&self, token: &str, review_id: &str, content: &str) -> Result<Review, ApiError>;

    async fn delete_review(&self, token: &str, review_id: &str) -> Result<(), ApiError>;

    // --- recommendations ---

    async fn recommendations(&self, token: &str, limit: u32) -> Result<RecommendationResponse, ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// Connection settings for [`HttpApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Gateway origin, e.g. `http://localhost:8080`. Paths are appended.
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        self.request_url(method, endpoint(&self.base_url, path), token)
    }

    fn request_url(&self, method: Method, url: impl IntoUrl, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(builder).await?;
        let text = response.text().await.map_err(|e| ApiError::Request(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn send_unit(builder: RequestBuilder) -> Result<(), ApiError> {
        Self::send(builder).await?;
        Ok(())
    }

    async fn get_page(&self, path: &str, page: u32, size: u32) -> Result<Page<Book>, ApiError> {
        Self::send_json(self.request(Method::GET, path, None).query(&[("page", page), ("size", size)])).await
    }
}

#[async_trait]
impl ShelveApi for HttpApi {
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        Self::send_json(self.request(Method::POST, "/api/auth/register", None).json(request)).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        Self::send_json(self.request(Method::POST, "/api/auth/login", None).json(request)).await
    }

    async fn profile(&self, token: &str) -> Result<UserProfile, ApiError> {
        Self::send_json(self.request(Method::GET, "/api/users/profile", Some(token))).await
    }

    async fn update_profile(&self, token: &str, request: &UpdateProfileRequest) -> Result<UserProfile, ApiError> {
        Self::send_json(self.request(Method::PUT, "/api/users/profile", Some(token)).json(request)).await
    }

    async fn change_password(&self, token: &str, request: &ChangePasswordRequest) -> Result<(), ApiError> {
        Self::send_unit(self.request(Method::PUT, "/api/users/password", Some(token)).json(request)).await
    }

    async fn complete_onboarding(&self, token: &str) -> Result<(), ApiError> {
        Self::send_unit(self.request(Method::POST, "/api/users/onboarding/complete", Some(token))).await
    }

    async fn list_books(&self, page: u32, size: u32) -> Result<Page<Book>, ApiError> {
        self.get_page("/api/books", page, size).await
    }

    async fn book(&self, book_id: &str) -> Result<Book, ApiError> {
        Self::send_json(self.request(Method::GET, &format!("/api/books/{book_id}"), None)).await
    }

    async fn search_books(&self, query: &str, page: u32, size: u32) -> Result<Page<Book>, ApiError> {
        let builder = self
            .request(Method::GET, "/api/books/search", None)
            .query(&[("q", query)])
            .query(&[("page", page), ("size", size)]);
        Self::send_json(builder).await
    }

    async fn books_by_genre(&self, genre: &str, page: u32, size: u32) -> Result<Page<Book>, ApiError> {
        let url = endpoint_with_segment(&self.base_url, "/api/books/genre", genre)?;
        Self::send_json(self.request_url(Method::GET, url, None).query(&[("page", page), ("size", size)])).await
    }

    async fn genres(&self) -> Result<Vec<String>, ApiError> {
        Self::send_json(self.request(Method::GET, "/api/books/genres", None)).await
    }

    async fn top_rated_books(&self, page: u32, size: u32) -> Result<Page<Book>, ApiError> {
        self.get_page("/api/books/top-rated", page, size).await
    }

    async fn recent_books(&self, page: u32, size: u32) -> Result<Page<Book>, ApiError> {
        self.get_page("/api/books/recent", page, size).await
    }

    async fn books_by_ids(&self, book_ids: &[String]) -> Result<Vec<Book>, ApiError> {
        if book_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = book_ids.join(",");
        Self::send_json(self.request(Method::GET, "/api/books/batch", None).query(&[("ids", ids)])).await
    }

    async fn my_shelves(&self, token: &str) -> Result<ShelvesResponse, ApiError> {
        Self::send_json(self.request(Method::GET, "/api/shelves", Some(token))).await
    }

    async fn shelf(&self, token: &str, status: ShelfStatus) -> Result<Vec<ShelfItem>, ApiError> {
        let path = format!("/api/shelves/{}", status.as_str());
        Self::send_json(self.request(Method::GET, &path, Some(token))).await
    }

    async fn shelf_item(&self, token: &str, book_id: &str) -> Result<Option<ShelfItem>, ApiError> {
        let path = format!("/api/shelves/books/{book_id}/status");
        not_found_as_none(Self::send_json(self.request(Method::GET, &path, Some(token))).await)
    }

    async fn add_to_shelf(&self, token: &str, book_id: &str, status: ShelfStatus) -> Result<ShelfItem, ApiError> {
        let path = shelf_book_path(status, book_id);
        Self::send_json(self.request(Method::POST, &path, Some(token))).await
    }

    async fn move_book(&self, token: &str, book_id: &str, status: ShelfStatus) -> Result<ShelfItem, ApiError> {
        let path = format!("/api/shelves/books/{book_id}");
        let body = MoveBookRequest { target_shelf: status };
        Self::send_json(self.request(Method::PUT, &path, Some(token)).json(&body)).await
    }

    async fn remove_from_shelf(&self, token: &str, book_id: &str) -> Result<(), ApiError> {
        let path = format!("/api/shelves/books/{book_id}");
        Self::send_unit(self.request(Method::DELETE, &path, Some(token))).await
    }

    async fn submit_initial_liked_books(&self, token: &str, book_ids: &[String]) -> Result<(), ApiError> {
        let body = InitialLikedBooksRequest { book_ids: book_ids.to_vec() };
        Self::send_unit(self.request(Method::POST, "/api/ratings/initial", Some(token)).json(&body)).await
    }

    async fn rate_book(&self, token: &str, book_id: &str, score: u8) -> Result<Rating, ApiError> {
        let body = CreateRatingRequest { book_id: book_id.to_owned(), score };
        Self::send_json(self.request(Method::POST, "/api/ratings", Some(token)).json(&body)).await
    }

    async fn user_rating(&self, token: &str, book_id: &str) -> Result<Option<Rating>, ApiError> {
        let path = format!("/api/ratings/book/{book_id}");
        not_found_as_none(Self::send_json(self.request(Method::GET, &path, Some(token))).await)
    }

    async fn user_ratings(&self, token: &str) -> Result<Vec<Rating>, ApiError> {
        Self::send_json(self.request(Method::GET, "/api/ratings/user", Some(token))).await
    }

    async fn average_rating(&self, token: &str, book_id: &str) -> Result<f64, ApiError> {
        let path = format!("/api/ratings/book/{book_id}/average");
        Self::send_json(self.request(Method::GET, &path, Some(token))).await
    }

    async fn book_reviews(&self, token: &str, book_id: &str) -> Result<Vec<Review>, ApiError> {
        let path = format!("/api/reviews/book/{book_id}");
        let listing: ReviewListing = Self::send_json(self.request(Method::GET, &path, Some(token))).await?;
        Ok(listing.into_reviews())
    }

    async fn create_review(&self, token: &str, book_id: &str, content: &str) -> Result<Review, ApiError> {
        let body = CreateReviewRequest { book_id: book_id.to_owned(), content: content.to_owned() };
        Self::send_json(self.request(Method::POST, "/api/reviews", Some(token)).json(&body)).await
    }

    async fn update_review(&self, token: &str, review_id: &str, content: &str) -> Result<Review, ApiError> {
        let body = UpdateReviewRequest { content: content.to_owned() };
        let path = format!("/api/reviews/{review_id}");
        Self::send_json(self.request(Method::PUT, &path, Some(token)).json(&body)).await
    }

    async fn delete_review(&self, token: &str, review_id: &str) -> Result<(), ApiError> {
        let path = format!("/api/reviews/{review_id}");
        Self::send_unit(self.request(Method::DELETE, &path, Some(token))).await
    }

    async fn recommendations(&self, token: &str, limit: u32) -> Result<RecommendationResponse, ApiError> {
        let builder = self.request(Method::GET, "/api/recommendations", Some(token)).query(&[("limit", limit)]);
        Self::send_json(builder).await
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// `base_url` + `path` + one percent-encoded segment (genre names contain
/// spaces).
fn endpoint_with_segment(base_url: &str, path: &str, segment: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(&endpoint(base_url, path)).map_err(|e| ApiError::Request(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| ApiError::Request(format!("cannot extend {base_url}")))?
        .push(segment);
    Ok(url)
}

/// Treat a 404 as "absent" for lookups that may legitimately find nothing.
fn not_found_as_none<T>(result: Result<T, ApiError>) -> Result<Option<T>, ApiError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ApiError::Response { status: 404, .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

fn shelf_book_path(status: ShelfStatus, book_id: &str) -> String {
    format!("/api/shelves/{}/books/{book_id}", status.as_str())
}

/// Map a non-success status and raw body to an [`ApiError`].
fn error_for_status(status: StatusCode, body: &str) -> ApiError {
    if status == StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized;
    }
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.trim().to_owned());
    let message = if message.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_owned()
    } else {
        message
    };
    ApiError::Response { status: status.as_u16(), message }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
