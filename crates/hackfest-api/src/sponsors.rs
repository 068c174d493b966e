use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;

use hackfest_types::api::SponsorsPage;

use crate::error::ApiError;
use crate::session::take_flash;
use crate::state::{AppState, run_db};
use crate::views;

/// Public page; first access seeds the placeholder sponsor set.
pub async fn sponsors_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let sponsors = run_db(&state, |db| {
        db.ensure_sponsors_seeded()?;
        db.list_sponsors()
    })
    .await?;

    let (jar, flash) = take_flash(jar);
    Ok((
        jar,
        Json(SponsorsPage {
            sponsors: sponsors.into_iter().map(views::sponsor).collect(),
            flash,
        }),
    ))
}
