//! Login page controller.

use super::{PageError, require_field, require_route};
use crate::net::api::ShelveApi;
use crate::net::types::LoginRequest;
use crate::routes::Route;
use crate::state::session::SessionStore;

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Authenticate and seed the session. Lands on onboarding when the account
/// still needs it, home otherwise.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] when a session already exists, a
/// validation error for blank fields, or the gateway error.
pub async fn submit(api: &dyn ShelveApi, store: &SessionStore, form: &LoginForm) -> Result<Route, PageError> {
    require_route(store, Route::Login)?;
    require_field(&form.email, "email")?;
    require_field(&form.password, "password")?;

    let request = LoginRequest { email: form.email.trim().to_owned(), password: form.password.clone() };
    let auth = api.login(&request).await?;
    store.set_auth(&auth);

    Ok(if store.needs_onboarding() { Route::Onboarding } else { Route::Home })
}

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;
