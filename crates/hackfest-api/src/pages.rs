use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;

use hackfest_types::api::{DashboardPage, FaqEntry, FaqPage, LandingPage};

use crate::auth::current_user;
use crate::error::ApiError;
use crate::session::{Session, take_flash};
use crate::state::{AppState, run_db};
use crate::views;

pub async fn landing(jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar);
    (jar, Json(LandingPage { flash }))
}

/// The authenticated summary view: team, roster, submission, sponsors
/// (seeded on first sight), and both admin broadcast feeds.
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let user = current_user(&state, &session).await?;

    let (user, team, members, submission, sponsors, updates, notifications) =
        run_db(&state, move |db| {
            let team = match user.team_id {
                Some(team_id) => db.get_team(team_id)?,
                None => None,
            };
            let members = match &team {
                Some(team) => db.team_roster(team.id)?,
                None => Vec::new(),
            };
            let submission = db.get_submission(user.id)?;
            db.ensure_sponsors_seeded()?;
            let sponsors = db.list_sponsors()?;
            let updates = db.list_live_updates()?;
            let notifications = db.list_notifications()?;
            Ok((user, team, members, submission, sponsors, updates, notifications))
        })
        .await?;

    let (jar, flash) = take_flash(jar);
    Ok((
        jar,
        Json(DashboardPage {
            user: views::user(user),
            team: team.map(views::team),
            team_members: members.into_iter().map(views::user).collect(),
            submission: submission.map(views::submission),
            sponsors: sponsors.into_iter().map(views::sponsor).collect(),
            live_updates: updates.into_iter().map(views::live_update).collect(),
            notifications: notifications.into_iter().map(views::notification).collect(),
            flash,
        }),
    ))
}

const FAQ: &[(&str, &str)] = &[
    (
        "Who can participate?",
        "Any registered student. Sign up with your college email and you are in.",
    ),
    (
        "How big can a team be?",
        "Create a team to get an invite code, then share it; anyone who registers with the code joins your team.",
    ),
    (
        "How do we submit our project?",
        "One member submits the title, description, repository link and demo video from the Submit page. Resubmitting overwrites the earlier entry.",
    ),
    (
        "Can I participate without a team?",
        "Yes, register without creating or joining a team and hack solo.",
    ),
    (
        "Where do announcements appear?",
        "Live updates and notifications from the organizers show up on your dashboard.",
    ),
];

pub async fn faq(jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar);
    let entries = FAQ
        .iter()
        .map(|&(question, answer)| FaqEntry { question, answer })
        .collect();
    (jar, Json(FaqPage { entries, flash }))
}
