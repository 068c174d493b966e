use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;

use hackfest_types::api::{FeedbackForm, FeedbackPage, Flash};

use crate::auth::current_user;
use crate::error::ApiError;
use crate::session::{Session, set_flash, take_flash};
use crate::state::{AppState, run_db};
use crate::views;

pub async fn feedback_page(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let user = current_user(&state, &session).await?;
    let entries = run_db(&state, move |db| db.list_feedback(user.id)).await?;

    let (jar, flash) = take_flash(jar);
    Ok((
        jar,
        Json(FeedbackPage {
            entries: entries.into_iter().map(views::feedback).collect(),
            flash,
        }),
    ))
}

/// Append-only; the rating is stored as the free text it arrived as.
pub async fn add_feedback(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Form(form): Form<FeedbackForm>,
) -> Result<impl IntoResponse, ApiError> {
    let user = current_user(&state, &session).await?;

    run_db(&state, move |db| {
        db.add_feedback(user.id, &form.body, &form.rating)
    })
    .await?;

    let jar = set_flash(jar, &Flash::success("Feedback submitted!"));
    Ok((jar, Redirect::to("/feedback")))
}
