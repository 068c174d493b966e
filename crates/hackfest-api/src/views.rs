//! Row-to-API conversions. The db crate's rows stay private to the server
//! side; these strip what must not leave (password hashes) and nothing else.

use hackfest_db::models::{
    BroadcastRow, FeedbackRow, SponsorRow, SubmissionRow, TeamRow, UserRow,
};
use hackfest_types::models::{
    Feedback, LiveUpdate, Notification, Sponsor, Submission, Team, User,
};

pub(crate) fn user(row: UserRow) -> User {
    User {
        id: row.id,
        name: row.name,
        email: row.email,
        phone: row.phone,
        college: row.college,
        team_id: row.team_id,
        created_at: row.created_at,
    }
}

pub(crate) fn team(row: TeamRow) -> Team {
    Team {
        id: row.id,
        name: row.name,
        invite_code: row.invite_code,
        created_by: row.created_by,
        created_at: row.created_at,
    }
}

pub(crate) fn submission(row: SubmissionRow) -> Submission {
    Submission {
        id: row.id,
        user_id: row.user_id,
        title: row.title,
        description: row.description,
        repo_link: row.repo_link,
        video_link: row.video_link,
        updated_at: row.updated_at,
    }
}

pub(crate) fn feedback(row: FeedbackRow) -> Feedback {
    Feedback {
        id: row.id,
        body: row.body,
        rating: row.rating,
        created_at: row.created_at,
    }
}

pub(crate) fn sponsor(row: SponsorRow) -> Sponsor {
    Sponsor {
        id: row.id,
        name: row.name,
        tier: row.tier,
        link: row.link,
    }
}

pub(crate) fn live_update(row: BroadcastRow) -> LiveUpdate {
    LiveUpdate {
        id: row.id,
        text: row.text,
        created_at: row.created_at,
    }
}

pub(crate) fn notification(row: BroadcastRow) -> Notification {
    Notification {
        id: row.id,
        text: row.text,
        created_at: row.created_at,
    }
}
