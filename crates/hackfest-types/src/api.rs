use serde::{Deserialize, Serialize};

use crate::models::{Feedback, LiveUpdate, Notification, Sponsor, Submission, Team, User};

// -- Flash messages --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

/// One transient message, set on redirect and consumed by the next page load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub message: String,
    pub level: FlashLevel,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: FlashLevel::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: FlashLevel::Error,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: FlashLevel::Info,
        }
    }
}

// -- Forms --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub password: String,
    pub team_choice: String,
    pub team_name: Option<String>,
    pub invite_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminLoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmissionForm {
    pub title: String,
    pub description: String,
    pub repo_link: String,
    pub video_link: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedbackForm {
    pub body: String,
    pub rating: String,
}

/// Body for both live updates and notifications.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BroadcastForm {
    pub text: String,
}

// -- Page data --

#[derive(Debug, Serialize)]
pub struct LandingPage {
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct RegisterPage {
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginPage {
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub user: User,
    pub team: Option<Team>,
    pub team_members: Vec<User>,
    pub submission: Option<Submission>,
    pub sponsors: Vec<Sponsor>,
    pub live_updates: Vec<LiveUpdate>,
    pub notifications: Vec<Notification>,
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct SubmitPage {
    pub submission: Option<Submission>,
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackPage {
    pub entries: Vec<Feedback>,
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct SponsorsPage {
    pub sponsors: Vec<Sponsor>,
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FaqPage {
    pub entries: Vec<FaqEntry>,
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboardPage {
    pub live_updates: Vec<LiveUpdate>,
    pub notifications: Vec<Notification>,
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct AdminTeamsPage {
    pub teams: Vec<Team>,
    pub flash: Option<Flash>,
}
