//! In-memory state behind the calendar screen.
//!
//! Every successful write reloads both the month list and the selected day's
//! list from the store, then rebuilds the markings. Nothing is patched in place.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::error;

use crate::database::{Database, DatabaseError};
use crate::marking::{build_markings, Markings};
use crate::models::Task;
use crate::utils::{days_in_month, shift_month};

#[derive(Debug, Clone)]
pub struct CalendarView {
    pub year: i32,
    pub month: u32,
    pub selected: NaiveDate,
    pub month_tasks: Vec<Task>,
    pub day_tasks: Vec<Task>,
    pub markings: Markings,
}

impl CalendarView {
    /// Empty view showing the month of `selected`. Call [`reload`](Self::reload) to fill it.
    pub fn new(selected: NaiveDate) -> Self {
        Self {
            year: selected.year(),
            month: selected.month(),
            selected,
            month_tasks: Vec::new(),
            day_tasks: Vec::new(),
            markings: build_markings(&[], selected),
        }
    }

    /// Re-read the month and day lists and rebuild markings
    pub fn reload(&mut self, db: &Database) -> Result<(), DatabaseError> {
        let month_tasks = db.tasks_overlapping_month(self.year, self.month)?;
        let day_tasks = db.tasks_overlapping_date(self.selected)?;
        self.markings = build_markings(&month_tasks, self.selected);
        self.month_tasks = month_tasks;
        self.day_tasks = day_tasks;
        Ok(())
    }

    /// Select a date, moving the visible month along with it
    pub fn select_date(&mut self, db: &Database, date: NaiveDate) -> Result<(), DatabaseError> {
        self.selected = date;
        self.year = date.year();
        self.month = date.month();
        self.reload(db)
    }

    /// Move the selection by a number of days
    pub fn move_selection(&mut self, db: &Database, days: i64) -> Result<(), DatabaseError> {
        let target = self
            .selected
            .checked_add_signed(chrono::Duration::days(days))
            .unwrap_or(self.selected);
        self.select_date(db, target)
    }

    /// Show another month, keeping the selected day-of-month where possible
    pub fn shift_month(&mut self, db: &Database, delta: i32) -> Result<(), DatabaseError> {
        let (year, month) = shift_month(self.year, self.month, delta);
        let day = self.selected.day().min(days_in_month(year, month));
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => self.select_date(db, date),
            None => Ok(()),
        }
    }

    pub fn next_month(&mut self, db: &Database) -> Result<(), DatabaseError> {
        self.shift_month(db, 1)
    }

    pub fn prev_month(&mut self, db: &Database) -> Result<(), DatabaseError> {
        self.shift_month(db, -1)
    }

    pub fn go_to(&mut self, db: &Database, today: NaiveDate) -> Result<(), DatabaseError> {
        self.select_date(db, today)
    }

    pub fn create_task(
        &mut self,
        db: &Database,
        title: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<i64, DatabaseError> {
        let id = db.create_task(title, start, end)?;
        self.reload_after_write(db);
        Ok(id)
    }

    pub fn update_task(
        &mut self,
        db: &Database,
        id: i64,
        title: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<usize, DatabaseError> {
        let changed = db.update_task(id, title, start, end)?;
        self.reload_after_write(db);
        Ok(changed)
    }

    pub fn set_completed(&mut self, db: &Database, id: i64, completed: bool) -> Result<usize, DatabaseError> {
        let changed = db.set_task_completed(id, completed)?;
        self.reload_after_write(db);
        Ok(changed)
    }

    pub fn delete_task(&mut self, db: &Database, id: i64) -> Result<usize, DatabaseError> {
        let changed = db.delete_task(id)?;
        self.reload_after_write(db);
        Ok(changed)
    }

    // The write already succeeded; a failed refresh leaves the old lists on screen.
    fn reload_after_write(&mut self, db: &Database) {
        if let Err(e) = self.reload(db) {
            error!("event=view_reload module=view status=error error={}", e);
        }
    }

    /// Find a task currently loaded for the month
    pub fn find_task(&self, id: i64) -> Option<&Task> {
        self.month_tasks.iter().find(|t| t.id == id)
    }
}
