use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rspotify::Token;

/// Nominal lifetime the remote grants an access token.
pub const TOKEN_LIFETIME_SECS: i64 = 3600;
/// Tokens older than this are treated as expired, 100 seconds before the remote does.
pub const EXPIRY_THRESHOLD_SECS: f64 = 3500.0;

pub const SCOPES: &str = "user-modify-playback-state playlist-read-private playlist-read-collaborative playlist-modify-private playlist-modify-public";

/// Bearer credential handed to us by whoever performed the login.
#[derive(Clone, Debug)]
pub struct TokenContext {
    token: String,
    issued_at: DateTime<Utc>,
}

impl TokenContext {
    pub fn new(token: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            issued_at,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn age_seconds(&self) -> f64 {
        self.age_seconds_at(Utc::now())
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn age_seconds_at(&self, now: DateTime<Utc>) -> f64 {
        (now - self.issued_at).num_milliseconds() as f64 / 1000.0
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.age_seconds_at(now) > EXPIRY_THRESHOLD_SECS
    }

    /// Token in the shape rspotify expects. Refreshing is left to the login flow.
    pub fn to_rspotify_token(&self) -> Token {
        Token {
            access_token: self.token.clone(),
            expires_in: Duration::seconds(TOKEN_LIFETIME_SECS),
            expires_at: Some(self.issued_at + Duration::seconds(TOKEN_LIFETIME_SECS)),
            scopes: SCOPES
                .split_whitespace()
                .map(|s| s.to_string())
                .collect::<HashSet<String>>(),
            refresh_token: None,
        }
    }
}
