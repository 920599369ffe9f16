//! Registration page controller.

use super::{PageError, require_field, require_route};
use crate::net::api::ShelveApi;
use crate::net::types::RegisterRequest;
use crate::routes::Route;
use crate::state::session::SessionStore;

#[derive(Clone, Debug, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Create the account, seed the session and send the user to onboarding.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] when a session already exists, a
/// validation error for blank fields, or the gateway error.
pub async fn submit(api: &dyn ShelveApi, store: &SessionStore, form: &RegisterForm) -> Result<Route, PageError> {
    require_route(store, Route::Register)?;
    require_field(&form.name, "name")?;
    require_field(&form.email, "email")?;
    require_field(&form.password, "password")?;

    let request = RegisterRequest {
        name: form.name.trim().to_owned(),
        email: form.email.trim().to_owned(),
        password: form.password.clone(),
    };
    let auth = api.register(&request).await?;
    store.set_auth(&auth);

    Ok(Route::Onboarding)
}

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;
