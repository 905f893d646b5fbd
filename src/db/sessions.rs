//! Login sessions: opaque bearer tokens with an expiry.

use super::{Database, millis_to_utc, now_ms};
use crate::types::Session;
use anyhow::Result;
use rusqlite::{OptionalExtension, params};
use uuid::Uuid;

/// Longest session lifetime honoured, whatever the config asks for.
pub const MAX_SESSION_TTL_SECONDS: i64 = 10 * 365 * 86_400;

impl Database {
    /// Issue a new session for `user_id` lasting `ttl_seconds`.
    pub fn create_session(&self, user_id: &str, ttl_seconds: i64) -> Result<Session> {
        self.with_conn(|conn| {
            let token = Uuid::new_v4().simple().to_string();
            let created_at = now_ms();
            let ttl_ms = ttl_seconds.clamp(0, MAX_SESSION_TTL_SECONDS) * 1000;
            let expires_at = created_at.saturating_add(ttl_ms);

            conn.execute(
                "INSERT INTO sessions (token, user_id, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![token, user_id, created_at, expires_at],
            )?;

            Ok(Session {
                token,
                user_id: user_id.to_string(),
                created_at: millis_to_utc(2, created_at)?,
                expires_at: millis_to_utc(3, expires_at)?,
            })
        })
    }

    /// Resolve a token to its user id. Expired and unknown tokens yield `None`.
    pub fn resolve_session(&self, token: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let user_id = conn
                .query_row(
                    "SELECT user_id FROM sessions WHERE token = ?1 AND expires_at > ?2",
                    params![token, now_ms()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(user_id)
        })
    }

    /// Revoke a session. Returns whether it existed.
    pub fn delete_session(&self, token: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
            Ok(deleted > 0)
        })
    }

    /// Remove expired sessions. Returns how many were removed.
    pub fn purge_expired_sessions(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let purged = conn.execute(
                "DELETE FROM sessions WHERE expires_at <= ?1",
                params![now_ms()],
            )?;
            Ok(purged)
        })
    }
}
