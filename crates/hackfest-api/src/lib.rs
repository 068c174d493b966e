pub mod admin;
pub mod auth;
pub mod error;
pub mod feedback;
pub mod pages;
pub mod session;
pub mod sponsors;
pub mod state;
pub mod submissions;
mod views;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

/// The whole HTTP surface. Authorization happens inside the handlers via the
/// `Session` extractor, so one flat router covers public, participant and
/// admin routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::landing))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(pages::dashboard))
        .route("/submit", get(submissions::submit_page).post(submissions::submit))
        .route("/feedback", get(feedback::feedback_page).post(feedback::add_feedback))
        .route("/sponsors", get(sponsors::sponsors_page))
        .route("/faq", get(pages::faq))
        .route("/admin/login", get(admin::admin_login_page).post(admin::admin_login))
        .route("/admin/logout", get(admin::admin_logout))
        .route("/admin/dashboard", get(admin::admin_dashboard))
        .route("/admin/add_update", post(admin::add_update))
        .route("/admin/add_notification", post(admin::add_notification))
        .route("/admin/delete_update/{id}", get(admin::delete_update))
        .route("/admin/delete_notification/{id}", get(admin::delete_notification))
        .route("/admin/teams", get(admin::admin_teams))
        .with_state(state)
}
