use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

impl Task {
    /// Calendar date the task starts on
    pub fn start_day(&self) -> NaiveDate {
        self.start_date.date()
    }

    /// Calendar date the task ends on
    pub fn end_day(&self) -> NaiveDate {
        self.end_date.date()
    }

    /// Whether the task's date-only interval contains `date` (inclusive on both ends)
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_day() <= date && date <= self.end_day()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    // Stored as entered. No hashing.
    pub password: String,
}

/// Unsaved task input coming from a form or the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

/// Hour a new task starts at when only a date is given
pub const DEFAULT_START_HOUR: u32 = 9;

/// Years SQLite's date functions understand; anything else never matches an overlap query
pub const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

impl TaskDraft {
    pub fn new(title: impl Into<String>, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Self {
            title: title.into().trim().to_string(),
            start_date,
            end_date,
        }
    }

    /// Draft for a new task on `date`: 09:00 to 10:00
    pub fn for_day(date: NaiveDate) -> Self {
        let start = date.and_time(
            NaiveTime::from_hms_opt(DEFAULT_START_HOUR, 0, 0).unwrap_or(NaiveTime::MIN),
        );
        Self {
            title: String::new(),
            start_date: start,
            end_date: start + Duration::hours(1),
        }
    }

    /// Check the draft before it reaches the store.
    /// Title must be non-blank, both years four-digit, and the range not inverted.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        for dt in [self.start_date, self.end_date] {
            if !STORABLE_YEARS.contains(&dt.year()) {
                return Err(format!("Year {} is out of range (0000-9999)", dt.year()));
            }
        }
        if self.end_date < self.start_date {
            return Err("End must not be before start".to_string());
        }
        Ok(())
    }
}
