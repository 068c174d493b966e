//! Database row types — these map directly to SQLite rows.
//! Distinct from the hackfest-types API models to keep the DB layer
//! independent; the password hash never leaves this crate's callers.

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub password_hash: String,
    pub team_id: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct TeamRow {
    pub id: i64,
    pub name: String,
    pub invite_code: String,
    pub created_by: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct SubmissionRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub repo_link: String,
    pub video_link: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct FeedbackRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub body: String,
    pub rating: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct SponsorRow {
    pub id: i64,
    pub name: String,
    pub tier: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BroadcastRow {
    pub id: i64,
    pub text: String,
    pub created_at: String,
}

/// Registration input; the password arrives already hashed.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub password_hash: String,
}

/// What registration should do about team membership.
#[derive(Debug)]
pub enum TeamPlan {
    /// Create a team; `None` derives a name from the user's first name token.
    Create { name: Option<String> },
    /// Join an existing team by invite code.
    Join { invite_code: String },
    /// No team for now.
    Solo,
}
