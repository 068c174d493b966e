use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

/// Dev-only fallbacks that must not survive into a real deployment.
const DEV_SESSION_SECRET: &str = "dev-secret-change-me";
const DEV_ADMIN_EMAIL: &str = "admin@hackfest.local";
const DEV_ADMIN_PASSWORD: &str = "admin123";

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub session_secret: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HACKFEST_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("HACKFEST_PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()?;
        let db_path: PathBuf = std::env::var("HACKFEST_DB_PATH")
            .unwrap_or_else(|_| "hackfest.db".into())
            .into();

        let session_secret =
            std::env::var("HACKFEST_SESSION_SECRET").unwrap_or_else(|_| DEV_SESSION_SECRET.into());
        if session_secret == DEV_SESSION_SECRET {
            warn!("HACKFEST_SESSION_SECRET is unset; using the dev placeholder");
        }

        let admin_email =
            std::env::var("HACKFEST_ADMIN_EMAIL").unwrap_or_else(|_| DEV_ADMIN_EMAIL.into());
        let admin_password =
            std::env::var("HACKFEST_ADMIN_PASSWORD").unwrap_or_else(|_| DEV_ADMIN_PASSWORD.into());
        if admin_password == DEV_ADMIN_PASSWORD {
            warn!("HACKFEST_ADMIN_PASSWORD is unset; using the dev placeholder");
        }

        Ok(Self {
            host,
            port,
            db_path,
            session_secret,
            admin_email,
            admin_password,
        })
    }
}
