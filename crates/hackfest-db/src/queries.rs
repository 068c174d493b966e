use anyhow::{Result, anyhow};
use rand::Rng;
use rusqlite::{Connection, OptionalExtension, params};

use crate::models::{
    BroadcastRow, FeedbackRow, NewUser, SponsorRow, SubmissionRow, TeamPlan, TeamRow, UserRow,
};
use crate::{Database, StoreError};

const INVITE_CODE_LEN: usize = 6;
const INVITE_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 36^6 possible codes; collisions are resolved by the insert retry loop,
/// never by a check-then-act lookup.
const INVITE_CODE_ATTEMPTS: usize = 32;

pub fn generate_invite_code() -> String {
    let mut rng = rand::rng();
    (0..INVITE_CODE_LEN)
        .map(|_| INVITE_CODE_CHARSET[rng.random_range(0..INVITE_CODE_CHARSET.len())] as char)
        .collect()
}

impl Database {
    // -- Registration --

    /// One logical registration: email check, team create/join, user insert
    /// and creator backfill all commit together or not at all.
    pub fn register_user(&self, new: &NewUser, plan: &TeamPlan) -> Result<UserRow, StoreError> {
        let res = self.with_txn(|tx| {
            if user_email_exists(tx, &new.email)? {
                return Err(StoreError::DuplicateEmail.into());
            }

            let team = match plan {
                TeamPlan::Create { name } => {
                    let team_name = match name.as_deref().map(str::trim) {
                        Some(n) if !n.is_empty() => n.to_string(),
                        _ => default_team_name(&new.name),
                    };
                    Some((insert_team_with_fresh_code(tx, &team_name)?, true))
                }
                TeamPlan::Join { invite_code } => {
                    match team_id_by_invite_code(tx, invite_code)? {
                        Some(id) => Some((id, false)),
                        None => return Err(StoreError::InvalidInviteCode.into()),
                    }
                }
                TeamPlan::Solo => None,
            };

            let user_id = insert_user(tx, new, team.map(|(id, _)| id))?;

            if let Some((team_id, true)) = team {
                tx.execute(
                    "UPDATE teams SET created_by = ?1 WHERE id = ?2",
                    [user_id, team_id],
                )?;
            }

            query_user_by_id(tx, user_id)?
                .ok_or_else(|| anyhow!("user {} vanished mid-transaction", user_id))
        });
        res.map_err(into_store_error)
    }

    // -- Users --

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    // -- Teams --

    pub fn get_team(&self, id: i64) -> Result<Option<TeamRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, name, invite_code, created_by, created_at
                     FROM teams WHERE id = ?1",
                    [id],
                    map_team_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn team_roster(&self, team_id: i64) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, email, phone, college, password_hash, team_id, created_at
                 FROM users WHERE team_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([team_id], map_user_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_teams(&self) -> Result<Vec<TeamRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, invite_code, created_by, created_at
                 FROM teams ORDER BY id",
            )?;
            let rows = stmt
                .query_map([], map_team_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Submissions --

    /// Create-or-overwrite in a single statement. The UNIQUE(user_id)
    /// constraint makes two racing writers converge on one row.
    pub fn upsert_submission(
        &self,
        user_id: i64,
        title: &str,
        description: &str,
        repo_link: &str,
        video_link: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO submissions (user_id, title, description, repo_link, video_link)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id) DO UPDATE SET
                     title       = excluded.title,
                     description = excluded.description,
                     repo_link   = excluded.repo_link,
                     video_link  = excluded.video_link,
                     updated_at  = datetime('now')",
                params![user_id, title, description, repo_link, video_link],
            )?;
            Ok(())
        })
    }

    pub fn get_submission(&self, user_id: i64) -> Result<Option<SubmissionRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, user_id, title, description, repo_link, video_link, updated_at
                     FROM submissions WHERE user_id = ?1",
                    [user_id],
                    |row| {
                        Ok(SubmissionRow {
                            id: row.get(0)?,
                            user_id: row.get(1)?,
                            title: row.get(2)?,
                            description: row.get(3)?,
                            repo_link: row.get(4)?,
                            video_link: row.get(5)?,
                            updated_at: row.get(6)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Feedback --

    pub fn add_feedback(&self, user_id: i64, body: &str, rating: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO feedback (user_id, body, rating) VALUES (?1, ?2, ?3)",
                params![user_id, body, rating],
            )?;
            Ok(())
        })
    }

    /// Newest first, by insertion order.
    pub fn list_feedback(&self, user_id: i64) -> Result<Vec<FeedbackRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, body, rating, created_at
                 FROM feedback WHERE user_id = ?1 ORDER BY id DESC",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(FeedbackRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        body: row.get(2)?,
                        rating: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Sponsors --

    /// Lazy one-time seed: runs on every sponsor-displaying page, inserts
    /// only when the table is empty. Transactional so two first-hits cannot
    /// both seed.
    pub fn ensure_sponsors_seeded(&self) -> Result<()> {
        self.with_txn(|tx| {
            let count: i64 = tx.query_row("SELECT COUNT(*) FROM sponsors", [], |r| r.get(0))?;
            if count > 0 {
                return Ok(());
            }
            for (name, tier) in [
                ("Alpha Tech Solutions", "Gold"),
                ("Beta Cloud Services", "Silver"),
                ("CodeCraft Academy", "Bronze"),
            ] {
                tx.execute(
                    "INSERT INTO sponsors (name, tier, link) VALUES (?1, ?2, ?3)",
                    params![name, tier, "https://example.com"],
                )?;
            }
            Ok(())
        })
    }

    pub fn list_sponsors(&self) -> Result<Vec<SponsorRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, tier, link FROM sponsors ORDER BY id")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(SponsorRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        tier: row.get(2)?,
                        link: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Live updates & notifications --

    pub fn add_live_update(&self, text: &str) -> Result<()> {
        self.append_broadcast("live_updates", text)
    }

    pub fn add_notification(&self, text: &str) -> Result<()> {
        self.append_broadcast("notifications", text)
    }

    pub fn list_live_updates(&self) -> Result<Vec<BroadcastRow>> {
        self.list_broadcasts("live_updates")
    }

    pub fn list_notifications(&self) -> Result<Vec<BroadcastRow>> {
        self.list_broadcasts("notifications")
    }

    pub fn delete_live_update(&self, id: i64) -> Result<(), StoreError> {
        self.delete_broadcast("live_updates", id)
    }

    pub fn delete_notification(&self, id: i64) -> Result<(), StoreError> {
        self.delete_broadcast("notifications", id)
    }

    fn append_broadcast(&self, table: &'static str, text: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(&format!("INSERT INTO {table} (text) VALUES (?1)"), [text])?;
            Ok(())
        })
    }

    fn list_broadcasts(&self, table: &'static str) -> Result<Vec<BroadcastRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT id, text, created_at FROM {table} ORDER BY id DESC"
            ))?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(BroadcastRow {
                        id: row.get(0)?,
                        text: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Deleting an id nobody has is a `NotFound`, not a silent no-op.
    fn delete_broadcast(&self, table: &'static str, id: i64) -> Result<(), StoreError> {
        let affected =
            self.with_conn(|conn| Ok(conn.execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])?))?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn into_store_error(e: anyhow::Error) -> StoreError {
    match e.downcast::<StoreError>() {
        Ok(store) => store,
        Err(other) => StoreError::Other(other),
    }
}

fn default_team_name(owner_name: &str) -> String {
    match owner_name.split_whitespace().next() {
        Some(first) => format!("Team-{first}"),
        None => "Team".to_string(),
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _)
        if e.code == rusqlite::ErrorCode::ConstraintViolation)
}

/// Insert a team under a freshly generated invite code, retrying on UNIQUE
/// conflicts. The constraint is the arbiter; generation never reads first.
fn insert_team_with_fresh_code(conn: &Connection, team_name: &str) -> Result<i64> {
    for _ in 0..INVITE_CODE_ATTEMPTS {
        let code = generate_invite_code();
        match conn.execute(
            "INSERT INTO teams (name, invite_code) VALUES (?1, ?2)",
            params![team_name, code],
        ) {
            Ok(_) => return Ok(conn.last_insert_rowid()),
            Err(e) if is_unique_violation(&e) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(anyhow!(
        "no unique invite code after {} attempts",
        INVITE_CODE_ATTEMPTS
    ))
}

fn team_id_by_invite_code(conn: &Connection, invite_code: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM teams WHERE invite_code = ?1",
            [invite_code],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

fn user_email_exists(conn: &Connection, email: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE email = ?1",
        [email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// The UNIQUE(email) constraint is the race-safe backstop behind the
/// pre-check in `register_user`.
fn insert_user(conn: &Connection, new: &NewUser, team_id: Option<i64>) -> Result<i64> {
    match conn.execute(
        "INSERT INTO users (name, email, phone, college, password_hash, team_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            new.name,
            new.email,
            new.phone,
            new.college,
            new.password_hash,
            team_id
        ],
    ) {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateEmail.into()),
        Err(e) => Err(e.into()),
    }
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let row = conn
        .query_row(
            "SELECT id, name, email, phone, college, password_hash, team_id, created_at
             FROM users WHERE email = ?1",
            [email],
            map_user_row,
        )
        .optional()?;
    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let row = conn
        .query_row(
            "SELECT id, name, email, phone, college, password_hash, team_id, created_at
             FROM users WHERE id = ?1",
            [id],
            map_user_row,
        )
        .optional()?;
    Ok(row)
}

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        college: row.get(4)?,
        password_hash: row.get(5)?,
        team_id: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_team_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TeamRow> {
    Ok(TeamRow {
        id: row.get(0)?,
        name: row.get(1)?,
        invite_code: row.get(2)?,
        created_by: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            college: "State College".to_string(),
            password_hash: "$argon2id$fake".to_string(),
        }
    }

    fn user_count(db: &Database) -> i64 {
        db.with_conn(|c| Ok(c.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?))
            .unwrap()
    }

    #[test]
    fn invite_codes_are_six_uppercase_alphanumerics() {
        for _ in 0..200 {
            let code = generate_invite_code();
            assert_eq!(code.len(), 6);
            assert!(
                code.bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()),
                "bad code {code}"
            );
        }
    }

    #[test]
    fn registration_with_create_builds_team_and_attaches_user() {
        let db = test_db();
        let user = db
            .register_user(
                &new_user("Ann Lee", "ann@x.com"),
                &TeamPlan::Create { name: None },
            )
            .unwrap();

        let team = db.get_team(user.team_id.unwrap()).unwrap().unwrap();
        assert_eq!(team.name, "Team-Ann");
        assert_eq!(team.invite_code.len(), 6);
        assert_eq!(team.created_by, Some(user.id));
    }

    #[test]
    fn explicit_team_name_wins_over_derived_one() {
        let db = test_db();
        let user = db
            .register_user(
                &new_user("Bo Chen", "bo@x.com"),
                &TeamPlan::Create {
                    name: Some("Night Owls".to_string()),
                },
            )
            .unwrap();
        let team = db.get_team(user.team_id.unwrap()).unwrap().unwrap();
        assert_eq!(team.name, "Night Owls");
    }

    #[test]
    fn duplicate_email_is_rejected_and_first_user_survives() {
        let db = test_db();
        db.register_user(&new_user("First", "dup@x.com"), &TeamPlan::Solo)
            .unwrap();

        let err = db
            .register_user(&new_user("Second", "dup@x.com"), &TeamPlan::Solo)
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));

        let survivor = db.get_user_by_email("dup@x.com").unwrap().unwrap();
        assert_eq!(survivor.name, "First");
        assert_eq!(user_count(&db), 1);
    }

    #[test]
    fn invite_codes_stay_unique_across_many_teams() {
        let db = test_db();
        let mut codes = HashSet::new();
        for i in 0..50 {
            let user = db
                .register_user(
                    &new_user("Member", &format!("m{i}@x.com")),
                    &TeamPlan::Create { name: None },
                )
                .unwrap();
            let team = db.get_team(user.team_id.unwrap()).unwrap().unwrap();
            assert!(codes.insert(team.invite_code.clone()), "duplicate code");
        }
        assert_eq!(codes.len(), 50);
    }

    #[test]
    fn joining_with_unknown_code_persists_no_user() {
        let db = test_db();
        let err = db
            .register_user(
                &new_user("Joiner", "join@x.com"),
                &TeamPlan::Join {
                    invite_code: "NOPE42".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInviteCode));
        assert!(db.get_user_by_email("join@x.com").unwrap().is_none());
        assert_eq!(user_count(&db), 0);
    }

    #[test]
    fn joining_by_code_lands_on_the_creators_team() {
        let db = test_db();
        let creator = db
            .register_user(
                &new_user("Ann Lee", "creator@x.com"),
                &TeamPlan::Create { name: None },
            )
            .unwrap();
        let team = db.get_team(creator.team_id.unwrap()).unwrap().unwrap();

        let joiner = db
            .register_user(
                &new_user("Joiner", "joiner@x.com"),
                &TeamPlan::Join {
                    invite_code: team.invite_code.clone(),
                },
            )
            .unwrap();
        assert_eq!(joiner.team_id, Some(team.id));

        let roster = db.team_roster(team.id).unwrap();
        let emails: Vec<_> = roster.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["creator@x.com", "joiner@x.com"]);
    }

    #[test]
    fn submission_upsert_keeps_one_row_with_latest_fields() {
        let db = test_db();
        let user = db
            .register_user(&new_user("Sub", "sub@x.com"), &TeamPlan::Solo)
            .unwrap();

        db.upsert_submission(user.id, "v1", "first", "https://git/a", "https://vid/a")
            .unwrap();
        db.upsert_submission(user.id, "v2", "second", "https://git/b", "https://vid/b")
            .unwrap();

        let count: i64 = db
            .with_conn(|c| Ok(c.query_row("SELECT COUNT(*) FROM submissions", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(count, 1);

        let sub = db.get_submission(user.id).unwrap().unwrap();
        assert_eq!(sub.title, "v2");
        assert_eq!(sub.description, "second");
        assert_eq!(sub.repo_link, "https://git/b");
        assert_eq!(sub.video_link, "https://vid/b");
    }

    #[test]
    fn feedback_lists_newest_first() {
        let db = test_db();
        let user = db
            .register_user(&new_user("Fb", "fb@x.com"), &TeamPlan::Solo)
            .unwrap();

        for body in ["one", "two", "three"] {
            db.add_feedback(user.id, body, "5").unwrap();
        }

        let entries = db.list_feedback(user.id).unwrap();
        let bodies: Vec<_> = entries.iter().map(|f| f.body.as_str()).collect();
        assert_eq!(bodies, vec!["three", "two", "one"]);
    }

    #[test]
    fn sponsor_seeding_is_idempotent() {
        let db = test_db();
        for _ in 0..3 {
            db.ensure_sponsors_seeded().unwrap();
        }
        let sponsors = db.list_sponsors().unwrap();
        assert_eq!(sponsors.len(), 3);
        let names: Vec<_> = sponsors.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Alpha Tech Solutions",
                "Beta Cloud Services",
                "CodeCraft Academy"
            ]
        );
    }

    #[test]
    fn deleting_missing_broadcast_is_not_found() {
        let db = test_db();
        let err = db.delete_live_update(999).unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        let err = db.delete_notification(999).unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn broadcasts_append_list_and_delete() {
        let db = test_db();
        db.add_live_update("doors open").unwrap();
        db.add_live_update("judging at 5pm").unwrap();
        db.add_notification("wifi password rotated").unwrap();

        let updates = db.list_live_updates().unwrap();
        let texts: Vec<_> = updates.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["judging at 5pm", "doors open"]);

        db.delete_live_update(updates[0].id).unwrap();
        assert_eq!(db.list_live_updates().unwrap().len(), 1);
        assert_eq!(db.list_notifications().unwrap().len(), 1);
    }
}
