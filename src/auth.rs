//! Local account credentials.
//!
//! Usernames are unique and compared case-sensitively. Passwords are kept in
//! plaintext, exactly as entered; introducing hashing would change which
//! stored credentials log in, so it is left as a known gap.

use log::{error, info, warn};
use rusqlite::{ErrorCode, OptionalExtension};
use thiserror::Error;

use crate::database::{Database, DatabaseError};
use crate::models::User;

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),
    #[error("Store error: {0}")]
    Store(#[from] DatabaseError),
}

impl RegisterError {
    /// Message shown to the person registering
    pub fn user_message(&self) -> &'static str {
        match self {
            RegisterError::DuplicateUsername(_) => "Registration failed: username already exists",
            RegisterError::Store(_) => "Registration failed: something went wrong",
        }
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl Database {
    /// Insert a new account. Fails with `DuplicateUsername` when the name is taken.
    pub fn register_user(&self, username: &str, password: &str) -> Result<i64, RegisterError> {
        match self.conn().execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            rusqlite::params![username, password],
        ) {
            Ok(_) => {
                let id = self.conn().last_insert_rowid();
                info!("event=register module=auth status=ok user_id={}", id);
                Ok(id)
            }
            Err(e) if is_unique_violation(&e) => {
                warn!("event=register module=auth status=error error_code=duplicate_username");
                Err(RegisterError::DuplicateUsername(username.to_string()))
            }
            Err(e) => {
                error!("event=register module=auth status=error error={}", e);
                Err(RegisterError::Store(e.into()))
            }
        }
    }

    /// True iff an account with exactly this username and password exists.
    /// Store failures count as a failed login.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        let found = self
            .conn()
            .query_row(
                "SELECT id FROM users WHERE username = ?1 AND password = ?2",
                rusqlite::params![username, password],
                |row| row.get::<_, i64>(0),
            )
            .optional();

        match found {
            Ok(Some(id)) => {
                info!("event=login module=auth status=ok user_id={}", id);
                true
            }
            Ok(None) => {
                info!("event=login module=auth status=rejected");
                false
            }
            Err(e) => {
                error!("event=login module=auth status=error error={}", e);
                false
            }
        }
    }

    /// Look up an account by username
    pub fn get_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        self.conn()
            .query_row(
                "SELECT id, username, password FROM users WHERE username = ?1",
                rusqlite::params![username],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(DatabaseError::from)
    }
}
