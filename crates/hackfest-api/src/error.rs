use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use thiserror::Error;
use tracing::error;

use hackfest_db::StoreError;
use hackfest_types::api::Flash;

use crate::session::set_flash;

/// Everything a request can fail with. All variants recover at the request
/// boundary as a flash message plus a redirect; none are fatal.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("invalid invite code")]
    InvalidInviteCode,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid admin credentials")]
    InvalidAdminCredentials,
    #[error("not found")]
    NotFound,
    #[error("login required")]
    Unauthenticated,
    #[error("admin access required")]
    Unauthorized,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn flash_and_target(&self) -> (Flash, &'static str) {
        match self {
            Self::DuplicateEmail => (Flash::error("Email already registered."), "/login"),
            Self::InvalidInviteCode => (Flash::error("Invalid invite code!"), "/register"),
            Self::InvalidCredentials => (Flash::error("Invalid credentials!"), "/login"),
            Self::InvalidAdminCredentials => {
                (Flash::error("Invalid admin credentials!"), "/admin/login")
            }
            Self::NotFound => (
                Flash::error("That entry no longer exists."),
                "/admin/dashboard",
            ),
            Self::Unauthenticated => (Flash::error("Login required."), "/login"),
            Self::Unauthorized => (Flash::error("Admin access required."), "/admin/login"),
            Self::Internal(_) => (
                Flash::error("Something went wrong. Please try again."),
                "/",
            ),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => Self::DuplicateEmail,
            StoreError::InvalidInviteCode => Self::InvalidInviteCode,
            StoreError::NotFound => Self::NotFound,
            StoreError::Other(e) => Self::Internal(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(e) = &self {
            error!("request failed: {e:#}");
        }
        let (flash, target) = self.flash_and_target();
        let jar = set_flash(CookieJar::default(), &flash);
        (jar, Redirect::to(target)).into_response()
    }
}
