use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::extract::State;
use axum::response::{IntoResponse, Redirect};
use axum::{Form, Json};
use axum_extra::extract::cookie::CookieJar;

use hackfest_db::models::{NewUser, TeamPlan, UserRow};
use hackfest_types::api::{Flash, LoginForm, LoginPage, RegisterForm, RegisterPage};

use crate::error::ApiError;
use crate::session::{Session, clear_session, issue_session, set_flash, take_flash};
use crate::state::{AppState, run_db, run_store};

/// Argon2id with a fresh salt. Used for participant passwords and for the
/// configured admin password at startup.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(hash: &str, password: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Resolve the session to a live user row. A cookie pointing at a vanished
/// user counts as not logged in.
pub(crate) async fn current_user(
    state: &AppState,
    session: &Session,
) -> Result<UserRow, ApiError> {
    let user_id = session.require_user()?;
    run_db(state, move |db| db.get_user_by_id(user_id))
        .await?
        .ok_or(ApiError::Unauthenticated)
}

pub async fn register_page(jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar);
    (jar, Json(RegisterPage { flash }))
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<impl IntoResponse, ApiError> {
    let password_hash = hash_password(&form.password).map_err(ApiError::Internal)?;
    let new = NewUser {
        name: form.name,
        email: form.email,
        phone: form.phone,
        college: form.college,
        password_hash,
    };
    let plan = match form.team_choice.as_str() {
        "create" => TeamPlan::Create {
            name: form.team_name,
        },
        "join" => TeamPlan::Join {
            invite_code: form.invite_code.unwrap_or_default(),
        },
        _ => TeamPlan::Solo,
    };

    run_store(&state, move |db| db.register_user(&new, &plan)).await?;

    let jar = set_flash(jar, &Flash::success("Registration successful."));
    Ok((jar, Redirect::to("/login")))
}

pub async fn login_page(jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar);
    (jar, Json(LoginPage { flash }))
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    let email = form.email;
    let user = run_db(&state, move |db| db.get_user_by_email(&email))
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&user.password_hash, &form.password) {
        return Err(ApiError::InvalidCredentials);
    }

    let claims = session.claims().with_user(user.id);
    let jar = issue_session(jar, &state.session_secret, &claims)?;
    let jar = set_flash(jar, &Flash::success("Logged in!"));
    Ok((jar, Redirect::to("/dashboard")))
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = clear_session(jar);
    let jar = set_flash(jar, &Flash::info("Logged out."));
    (jar, Redirect::to("/"))
}
