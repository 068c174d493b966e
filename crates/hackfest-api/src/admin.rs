use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;

use hackfest_types::api::{
    AdminDashboardPage, AdminLoginForm, AdminLoginPage, AdminTeamsPage, BroadcastForm, Flash,
};
use hackfest_types::session::Claims;

use crate::auth::verify_password;
use crate::error::ApiError;
use crate::session::{Session, issue_session, set_flash, take_flash};
use crate::state::{AppState, run_db, run_store};
use crate::views;

pub async fn admin_login_page(jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar);
    (jar, Json(AdminLoginPage { flash }))
}

/// Admin identity is a configured credential pair, checked here and carried
/// afterwards only as the signed `admin` claim.
pub async fn admin_login(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Form(form): Form<AdminLoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    if form.email != state.admin_email
        || !verify_password(&state.admin_password_hash, &form.password)
    {
        return Err(ApiError::InvalidAdminCredentials);
    }

    let claims = Claims::new(session.user_id, true);
    let jar = issue_session(jar, &state.session_secret, &claims)?;
    let jar = set_flash(jar, &Flash::success("Admin login successful!"));
    Ok((jar, Redirect::to("/admin/dashboard")))
}

/// Drops the admin flag only; a participant stays logged in.
pub async fn admin_logout(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let claims = session.claims().without_admin();
    let jar = issue_session(jar, &state.session_secret, &claims)?;
    let jar = set_flash(jar, &Flash::info("Admin logged out."));
    Ok((jar, Redirect::to("/admin/login")))
}

pub async fn admin_dashboard(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    session.require_admin()?;

    let (updates, notifications) = run_db(&state, |db| {
        Ok((db.list_live_updates()?, db.list_notifications()?))
    })
    .await?;

    let (jar, flash) = take_flash(jar);
    Ok((
        jar,
        Json(AdminDashboardPage {
            live_updates: updates.into_iter().map(views::live_update).collect(),
            notifications: notifications.into_iter().map(views::notification).collect(),
            flash,
        }),
    ))
}

pub async fn add_update(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Form(form): Form<BroadcastForm>,
) -> Result<impl IntoResponse, ApiError> {
    session.require_admin()?;
    run_db(&state, move |db| db.add_live_update(&form.text)).await?;
    let jar = set_flash(jar, &Flash::success("Update posted."));
    Ok((jar, Redirect::to("/admin/dashboard")))
}

pub async fn add_notification(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Form(form): Form<BroadcastForm>,
) -> Result<impl IntoResponse, ApiError> {
    session.require_admin()?;
    run_db(&state, move |db| db.add_notification(&form.text)).await?;
    let jar = set_flash(jar, &Flash::success("Notification posted."));
    Ok((jar, Redirect::to("/admin/dashboard")))
}

pub async fn delete_update(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    session.require_admin()?;
    run_store(&state, move |db| db.delete_live_update(id)).await?;
    let jar = set_flash(jar, &Flash::success("Update deleted."));
    Ok((jar, Redirect::to("/admin/dashboard")))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    session.require_admin()?;
    run_store(&state, move |db| db.delete_notification(id)).await?;
    let jar = set_flash(jar, &Flash::success("Notification deleted."));
    Ok((jar, Redirect::to("/admin/dashboard")))
}

/// Read-only oversight of every team, invite codes included.
pub async fn admin_teams(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    session.require_admin()?;

    let teams = run_db(&state, |db| db.list_teams()).await?;

    let (jar, flash) = take_flash(jar);
    Ok((
        jar,
        Json(AdminTeamsPage {
            teams: teams.into_iter().map(views::team).collect(),
            flash,
        }),
    ))
}
