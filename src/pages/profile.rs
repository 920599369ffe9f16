//! Profile page controller: account details, password, logout.

use super::{PageError, expire_on_unauthorized, require_field, require_route, require_token};
use crate::net::api::ShelveApi;
use crate::net::types::{ChangePasswordRequest, UpdateProfileRequest, UserPatch, UserProfile};
use crate::routes::Route;
use crate::state::session::SessionStore;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug, Default)]
pub struct ProfileForm {
    pub name: String,
}

#[derive(Clone, Debug, Default)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Result of submitting the profile form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileUpdate {
    /// Nothing differed from the session's user; no request was sent.
    Unchanged,
    Updated(UserProfile),
}

/// Save a changed display name and mirror it into the session.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] unless the profile page is reachable, a
/// validation error for a blank name, or the gateway error.
pub async fn update_profile(
    api: &dyn ShelveApi,
    store: &SessionStore,
    form: &ProfileForm,
) -> Result<ProfileUpdate, PageError> {
    require_route(store, Route::Profile)?;
    require_field(&form.name, "name")?;
    let token = require_token(store)?;
    let name = form.name.trim();
    if store.user().is_some_and(|u| u.name == name) {
        return Ok(ProfileUpdate::Unchanged);
    }

    let request = UpdateProfileRequest { name: Some(name.to_owned()), ..UpdateProfileRequest::default() };
    let profile = api
        .update_profile(&token, &request)
        .await
        .map_err(|e| expire_on_unauthorized(store, e))?;
    store.update_user(&UserPatch {
        name: Some(profile.name.clone()),
        email: Some(profile.email.clone()),
        ..UserPatch::default()
    });
    Ok(ProfileUpdate::Updated(profile))
}

/// Fetch the server-side profile and merge name and email into the session.
///
/// Works from any signed-in state, onboarding included. A server that
/// reports onboarding done settles a pending local flow through
/// [`SessionStore::complete_onboarding`], so the user record and
/// `needs_onboarding` never disagree. The reverse is ignored.
///
/// # Errors
///
/// Returns [`PageError::NotAuthenticated`] without a session, or the gateway error.
pub async fn refresh_profile(api: &dyn ShelveApi, store: &SessionStore) -> Result<UserProfile, PageError> {
    let token = require_token(store)?;
    let profile = api.profile(&token).await.map_err(|e| expire_on_unauthorized(store, e))?;
    store.update_user(&UserPatch {
        email: Some(profile.email.clone()),
        name: Some(profile.name.clone()),
        ..UserPatch::default()
    });
    if profile.onboarding_complete && store.needs_onboarding() {
        store.complete_onboarding();
    }
    Ok(profile)
}

/// Check a password change locally before sending it.
pub(crate) fn validate_password_form(form: &PasswordForm) -> Result<(), PageError> {
    require_field(&form.current_password, "current password")?;
    if form.new_password != form.confirm_password {
        return Err(PageError::Validation("Passwords do not match".to_owned()));
    }
    if form.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PageError::Validation(format!("Password must be at least {MIN_PASSWORD_LEN} characters")));
    }
    Ok(())
}

/// Change the account password.
///
/// # Errors
///
/// Returns [`PageError::Redirect`] unless the profile page is reachable, a
/// validation error for mismatched or short passwords, or the gateway error.
pub async fn change_password(api: &dyn ShelveApi, store: &SessionStore, form: &PasswordForm) -> Result<(), PageError> {
    require_route(store, Route::Profile)?;
    validate_password_form(form)?;
    let token = require_token(store)?;
    let request = ChangePasswordRequest {
        current_password: form.current_password.clone(),
        new_password: form.new_password.clone(),
    };
    api.change_password(&token, &request)
        .await
        .map_err(|e| expire_on_unauthorized(store, e))
}

/// End the session locally.
pub fn logout(store: &SessionStore) -> Route {
    store.logout();
    Route::Login
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;
