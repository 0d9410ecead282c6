use chrono::Duration;
use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

use crate::auth::RegisterError;
use crate::database::{Database, DatabaseError};
use crate::marking::{build_markings, Markings};
use crate::models::{Task, TaskDraft};
use crate::remote::{self, RemoteError};
use crate::utils::{format_datetime, month_bounds, parse_date, parse_datetime, parse_month};

#[derive(Parser)]
#[command(name = "warayaki")]
#[command(about = "Calendar tasks with local accounts, in the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Create a local account
    Register {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Check a username and password
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Start (YYYY-MM-DD HH:MM, or YYYY-MM-DD for 09:00)
        #[arg(long)]
        start: String,
        /// End; defaults to one hour after start
        #[arg(long)]
        end: Option<String>,
    },
    /// Replace a task's title and dates
    Edit {
        id: i64,
        title: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Mark a task completed
    Complete {
        id: i64,
        /// Mark as not completed instead
        #[arg(long)]
        undo: bool,
    },
    /// Delete a task
    Delete { id: i64 },
    /// List tasks overlapping a month (YYYY-MM)
    Month {
        month: String,
        /// Print the month's tasks and day markings as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tasks overlapping a day (YYYY-MM-DD)
    Day { date: String },
    /// List upcoming events from a linked external calendar
    Upcoming {
        /// OAuth bearer token for the calendar API
        #[arg(long, env = "WARAYAKI_CALENDAR_TOKEN")]
        token: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("{}", .0.user_message())]
    RegisterError(#[from] RegisterError),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("{0}")]
    InvalidInput(String),
    #[error("Task {0} not found")]
    TaskNotFound(i64),
    #[error("Calendar error: {0}")]
    RemoteError(#[from] RemoteError),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

fn require_credentials(username: &str, password: &str) -> Result<(), CliError> {
    if username.trim().is_empty() || password.trim().is_empty() {
        return Err(CliError::InvalidInput("Username and password are required".to_string()));
    }
    Ok(())
}

fn build_draft(title: String, start: &str, end: Option<&str>) -> Result<TaskDraft, CliError> {
    let start = parse_datetime(start).map_err(CliError::InvalidInput)?;
    let end = match end {
        Some(end) => parse_datetime(end).map_err(CliError::InvalidInput)?,
        None => start + Duration::hours(1),
    };
    let draft = TaskDraft::new(title, start, end);
    draft.validate().map_err(CliError::InvalidInput)?;
    Ok(draft)
}

fn found(id: i64, rows: usize) -> Result<(), CliError> {
    if rows == 0 {
        Err(CliError::TaskNotFound(id))
    } else {
        Ok(())
    }
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks");
        return;
    }
    for task in tasks {
        let mark = if task.completed { "✓" } else { "○" };
        println!(
            "{:>4} {} {}  [{} → {}]",
            task.id,
            mark,
            task.title,
            format_datetime(&task.start_date),
            format_datetime(&task.end_date)
        );
    }
}

pub fn handle_register(username: String, password: String, db: &Database) -> Result<(), CliError> {
    require_credentials(&username, &password)?;
    db.register_user(&username, &password)?;
    println!("Registered {}", username);
    Ok(())
}

pub fn handle_login(username: String, password: String, db: &Database) -> Result<(), CliError> {
    require_credentials(&username, &password)?;
    if db.authenticate(&username, &password) {
        println!("Credentials valid");
        Ok(())
    } else {
        Err(CliError::InvalidCredentials)
    }
}

pub fn handle_add(title: String, start: String, end: Option<String>, db: &Database) -> Result<(), CliError> {
    let draft = build_draft(title, &start, end.as_deref())?;
    let id = db.create_task(&draft.title, draft.start_date, draft.end_date)?;
    println!("Task created successfully (ID: {})", id);
    Ok(())
}

pub fn handle_edit(id: i64, title: String, start: String, end: String, db: &Database) -> Result<(), CliError> {
    let draft = build_draft(title, &start, Some(end.as_str()))?;
    found(id, db.update_task(id, &draft.title, draft.start_date, draft.end_date)?)?;
    println!("Task {} updated", id);
    Ok(())
}

pub fn handle_complete(id: i64, undo: bool, db: &Database) -> Result<(), CliError> {
    found(id, db.set_task_completed(id, !undo)?)?;
    if undo {
        println!("Task {} marked as not completed", id);
    } else {
        println!("Task {} completed", id);
    }
    Ok(())
}

pub fn handle_delete(id: i64, db: &Database) -> Result<(), CliError> {
    found(id, db.delete_task(id)?)?;
    println!("Task {} deleted", id);
    Ok(())
}

#[derive(Serialize)]
struct MonthReport<'a> {
    tasks: &'a [Task],
    markings: Markings,
}

/// Month tasks plus their day markings, with the first of the month selected
fn month_report_json(tasks: &[Task], year: i32, month: u32) -> Result<String, CliError> {
    let (first_day, _) = month_bounds(year, month)
        .ok_or_else(|| CliError::InvalidInput(format!("Invalid month {}-{:02}", year, month)))?;
    let report = MonthReport {
        tasks,
        markings: build_markings(tasks, first_day),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn handle_month(month: String, json: bool, db: &Database) -> Result<(), CliError> {
    let (year, month) = parse_month(&month).map_err(CliError::InvalidInput)?;
    let tasks = db.tasks_overlapping_month(year, month)?;
    if json {
        println!("{}", month_report_json(&tasks, year, month)?);
    } else {
        print_tasks(&tasks);
    }
    Ok(())
}

pub fn handle_day(date: String, db: &Database) -> Result<(), CliError> {
    let date = parse_date(&date)
        .map_err(|e| CliError::InvalidInput(format!("Invalid date '{}': {}", date, e)))?;
    print_tasks(&db.tasks_overlapping_date(date)?);
    Ok(())
}

pub fn handle_upcoming(token: String) -> Result<(), CliError> {
    let events = remote::fetch_upcoming_events(&token, chrono::Utc::now())?;
    if events.is_empty() {
        println!("No upcoming events");
    }
    for event in events {
        println!("{}  {}", event.start, event.summary);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_draft_defaults_end_to_one_hour_later() {
        let draft = build_draft("Report".to_string(), "2025-07-01 10:00", None).unwrap();
        assert_eq!(draft.end_date - draft.start_date, Duration::hours(1));
    }

    #[test]
    fn build_draft_rejects_five_digit_year() {
        let err = build_draft("x".to_string(), "+10000-01-05 09:00", None);
        assert!(matches!(err, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn add_stores_trimmed_title() {
        let db = Database::open_in_memory().unwrap();
        handle_add("  Report  ".to_string(), "2025-07-01 10:00".to_string(), None, &db).unwrap();
        let tasks = db.tasks_overlapping_month(2025, 7).unwrap();
        assert_eq!(tasks[0].title, "Report");
    }

    #[test]
    fn build_draft_rejects_inverted_range() {
        let err = build_draft("Report".to_string(), "2025-07-02 10:00", Some("2025-07-01 10:00"));
        assert!(matches!(err, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn edit_of_missing_task_reports_not_found() {
        let db = Database::open_in_memory().unwrap();
        let result = handle_edit(
            42,
            "Nothing".to_string(),
            "2025-07-01".to_string(),
            "2025-07-01 12:00".to_string(),
            &db,
        );
        assert!(matches!(result, Err(CliError::TaskNotFound(42))));
    }

    #[test]
    fn duplicate_registration_surfaces_specific_message() {
        let db = Database::open_in_memory().unwrap();
        handle_register("aiko".to_string(), "pw".to_string(), &db).unwrap();
        let err = handle_register("aiko".to_string(), "other".to_string(), &db).unwrap_err();
        assert_eq!(err.to_string(), "Registration failed: username already exists");
    }

    #[test]
    fn month_json_lists_periods_per_day() {
        let db = Database::open_in_memory().unwrap();
        let start = parse_datetime("2025-06-30 08:00").unwrap();
        let end = parse_datetime("2025-07-02 20:00").unwrap();
        db.create_task("Trip", start, end).unwrap();

        let tasks = db.tasks_overlapping_month(2025, 7).unwrap();
        let json = month_report_json(&tasks, 2025, 7).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["tasks"].as_array().unwrap().len(), 1);
        let first = &value["markings"]["2025-07-01"];
        assert_eq!(first["selected"], true);
        assert_eq!(first["periods"][0]["color"], "Incomplete");
        assert_eq!(value["markings"]["2025-07-02"]["periods"][0]["ending_day"], true);
    }
}
