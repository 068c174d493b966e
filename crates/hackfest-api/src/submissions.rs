use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;

use hackfest_types::api::{Flash, SubmissionForm, SubmitPage};

use crate::auth::current_user;
use crate::error::ApiError;
use crate::session::{Session, set_flash, take_flash};
use crate::state::{AppState, run_db};
use crate::views;

pub async fn submit_page(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let user = current_user(&state, &session).await?;
    let submission = run_db(&state, move |db| db.get_submission(user.id)).await?;

    let (jar, flash) = take_flash(jar);
    Ok((
        jar,
        Json(SubmitPage {
            submission: submission.map(views::submission),
            flash,
        }),
    ))
}

/// Create-or-update: one submission per user, latest write wins.
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Form(form): Form<SubmissionForm>,
) -> Result<impl IntoResponse, ApiError> {
    let user = current_user(&state, &session).await?;

    run_db(&state, move |db| {
        db.upsert_submission(
            user.id,
            &form.title,
            &form.description,
            &form.repo_link,
            &form.video_link,
        )
    })
    .await?;

    let jar = set_flash(jar, &Flash::success("Submission saved!"));
    Ok((jar, Redirect::to("/dashboard")))
}
