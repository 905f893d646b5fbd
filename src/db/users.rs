//! User accounts.

use super::{Database, millis_to_utc, now_ms};
use crate::error::ApiError;
use crate::types::User;
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, created_at, updated_at";

fn parse_user_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        created_at: millis_to_utc(3, row.get(3)?)?,
        updated_at: millis_to_utc(4, row.get(4)?)?,
    })
}

fn get_user_internal(conn: &Connection, user_id: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![user_id],
            parse_user_row,
        )
        .optional()?;
    Ok(user)
}

impl Database {
    /// Create a user. The email must already be normalized to lowercase.
    ///
    /// Fails with `AlreadyExists` when the email is taken.
    pub fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        self.with_conn(|conn| {
            let id = Uuid::new_v4().to_string();
            let now = now_ms();

            let inserted = conn.execute(
                "INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![id, name, email, password_hash, now],
            );

            match inserted {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    return Err(
                        ApiError::already_exists("User already exists with this email").into(),
                    );
                }
                Err(e) => return Err(e.into()),
            }

            get_user_internal(conn, &id)?
                .ok_or_else(|| anyhow::anyhow!("user {} missing after insert", id))
        })
    }

    /// Get a user by id.
    pub fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.with_conn(|conn| get_user_internal(conn, user_id))
    }

    /// Get a user by (normalized) email.
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let user = conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                    params![email],
                    parse_user_row,
                )
                .optional()?;
            Ok(user)
        })
    }

    /// Look up a user and their password hash by email, for sign-in only.
    pub fn find_credentials(&self, email: &str) -> Result<Option<(User, String)>> {
        self.with_conn(|conn| {
            let found = conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?1"),
                    params![email],
                    |row| Ok((parse_user_row(row)?, row.get::<_, String>(5)?)),
                )
                .optional()?;
            Ok(found)
        })
    }
}
