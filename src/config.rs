use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::auth::TokenContext;

pub const ACCESS_TOKEN_VAR: &str = "SPOTIFY_ACCESS_TOKEN";
pub const ISSUED_AT_VAR: &str = "SPOTIFY_TOKEN_ISSUED_AT";
pub const DEVICE_ID_VAR: &str = "SPOTIFY_DEVICE_ID";
pub const LOG_DIR_VAR: &str = "SPOTIFY_SIEVE_LOG_DIR";

const DEFAULT_LOG_DIR: &str = ".logs";

/// Settings read from the environment (and `.env`, if present).
#[derive(Clone, Debug)]
pub struct Config {
    pub access_token: String,
    pub issued_at: DateTime<Utc>,
    pub device_id: Option<String>,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let access_token = lookup(ACCESS_TOKEN_VAR)
            .filter(|t| !t.trim().is_empty())
            .with_context(|| format!("{} is not set. Put a bearer token in the environment or .env", ACCESS_TOKEN_VAR))?;

        let issued_at = match lookup(ISSUED_AT_VAR) {
            Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
                .with_context(|| format!("{} must be an RFC 3339 timestamp, got {:?}", ISSUED_AT_VAR, raw))?
                .with_timezone(&Utc),
            None => Utc::now(),
        };

        Ok(Self {
            access_token,
            issued_at,
            device_id: lookup(DEVICE_ID_VAR).filter(|d| !d.is_empty()),
            log_dir: lookup(LOG_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
        })
    }

    pub fn token(&self) -> TokenContext {
        TokenContext::new(self.access_token.clone(), self.issued_at)
    }
}
