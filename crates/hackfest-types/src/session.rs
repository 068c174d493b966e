use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// Session lifetime. Hackathons run for a weekend; a week of slack is plenty.
const SESSION_DAYS: i64 = 7;

/// Signed session claims carried in the session cookie.
///
/// Canonical definition lives here so hackfest-api (cookie handling) and the
/// server tests agree on one shape. `sub` is the participant identity and is
/// absent for an admin who never registered; `admin` is the verified admin
/// flag — both travel only inside the signed token, never as raw cookie
/// values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<i64>,
    #[serde(default)]
    pub admin: bool,
    pub exp: usize,
}

impl Claims {
    pub fn new(sub: Option<i64>, admin: bool) -> Self {
        Self {
            sub,
            admin,
            exp: (Utc::now() + Duration::days(SESSION_DAYS)).timestamp() as usize,
        }
    }

    /// Participant login: keep an already-granted admin flag alive.
    pub fn with_user(self, user_id: i64) -> Self {
        Self {
            sub: Some(user_id),
            ..self
        }
    }

    /// Admin logout drops only the admin flag, not the participant identity.
    pub fn without_admin(self) -> Self {
        Self {
            admin: false,
            ..self
        }
    }
}
