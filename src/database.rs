use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, error, info};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

use crate::models::Task;
use crate::utils::month_bounds;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

/// Handle to the task/account store.
///
/// Constructed once at startup and passed to whatever needs it; there is no
/// process-wide connection.
pub struct Database {
    conn: Connection,
}

const TASK_COLUMNS: &str = "id, title, completed, startDate, endDate";

impl Database {
    /// Open (or create) the database file and initialize the schema
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let db_path = path.as_ref();

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = match Connection::open(db_path) {
            Ok(conn) => conn,
            Err(e) => {
                error!("event=db_open module=database status=error mode=file error={}", e);
                return Err(e.into());
            }
        };
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        let db = Database { conn };
        db.initialize_schema()?;
        info!("event=db_open module=database status=ok mode=file");

        Ok(db)
    }

    /// Open a private in-memory database with the schema applied
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let db = Database {
            conn: Connection::open_in_memory()?,
        };
        db.initialize_schema()?;
        info!("event=db_open module=database status=ok mode=memory");
        Ok(db)
    }

    /// Create tables and indexes. Safe to run on every startup.
    pub fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                username        TEXT NOT NULL UNIQUE,
                password        TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                completed       INTEGER DEFAULT 0,
                startDate       TEXT NOT NULL,
                endDate         TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_start_date ON tasks(startDate)",
            [],
        )?;

        Ok(())
    }

    /// Get a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
        Ok(Task {
            id: row.get(0)?,
            title: row.get(1)?,
            completed: row.get::<_, i64>(2)? != 0,
            start_date: row.get(3)?,
            end_date: row.get(4)?,
        })
    }

    /// Insert a new, not yet completed task and return its ID.
    /// Title and range are stored as given.
    pub fn create_task(
        &self,
        title: &str,
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
    ) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO tasks (title, completed, startDate, endDate) VALUES (?1, 0, ?2, ?3)",
            rusqlite::params![title, start_date, end_date],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("event=task_create module=database status=ok id={}", id);
        Ok(id)
    }

    /// Replace title and both dates. Returns the number of rows changed (0 if no such task).
    pub fn update_task(
        &self,
        id: i64,
        title: &str,
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
    ) -> Result<usize, DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET title = ?1, startDate = ?2, endDate = ?3 WHERE id = ?4",
            rusqlite::params![title, start_date, end_date, id],
        )?;
        debug!("event=task_update module=database status=ok id={} rows={}", id, changed);
        Ok(changed)
    }

    /// Set only the completion flag
    pub fn set_task_completed(&self, id: i64, completed: bool) -> Result<usize, DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET completed = ?1 WHERE id = ?2",
            rusqlite::params![completed as i64, id],
        )?;
        debug!(
            "event=task_set_completed module=database status=ok id={} completed={} rows={}",
            id, completed, changed
        );
        Ok(changed)
    }

    pub fn delete_task(&self, id: i64) -> Result<usize, DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", rusqlite::params![id])?;
        debug!("event=task_delete module=database status=ok id={} rows={}", id, changed);
        Ok(changed)
    }

    /// Get a single task by ID
    pub fn get_task(&self, id: i64) -> Result<Option<Task>, DatabaseError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS);
        self.conn
            .query_row(&sql, rusqlite::params![id], Self::row_to_task)
            .optional()
            .map_err(DatabaseError::from)
    }

    /// All tasks whose date-only range intersects the given month, earliest start first.
    ///
    /// Uses `date(start) <= last_day AND date(end) >= first_day`, so a task
    /// starting in an earlier month and reaching into this one is included.
    pub fn tasks_overlapping_month(&self, year: i32, month: u32) -> Result<Vec<Task>, DatabaseError> {
        let (first_day, last_day) =
            month_bounds(year, month).ok_or(DatabaseError::InvalidMonth { year, month })?;
        self.tasks_overlapping_range(first_day, last_day)
    }

    /// All tasks whose date-only range contains `date`, earliest start first
    pub fn tasks_overlapping_date(&self, date: NaiveDate) -> Result<Vec<Task>, DatabaseError> {
        self.tasks_overlapping_range(date, date)
    }

    fn tasks_overlapping_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Task>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM tasks
             WHERE date(startDate) <= ?1 AND date(endDate) >= ?2
             ORDER BY startDate ASC, id ASC",
            TASK_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(rusqlite::params![to, from], Self::row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }
}
