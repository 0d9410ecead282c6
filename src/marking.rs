//! Per-day calendar markings derived from a month's tasks.
//!
//! Markings are never stored. [`build_markings`] is a pure function of the
//! task list and the selected date.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Task;

/// Colour a period is drawn with, keyed only on completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PeriodColor {
    Incomplete,
    Complete,
}

impl PeriodColor {
    pub fn for_task(task: &Task) -> Self {
        if task.completed {
            PeriodColor::Complete
        } else {
            PeriodColor::Incomplete
        }
    }
}

/// One task's contribution to one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    pub task_id: i64,
    pub starting_day: bool,
    pub ending_day: bool,
    pub color: PeriodColor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayMarking {
    /// In task order; overlapping tasks each add their own period
    pub periods: Vec<Period>,
    pub selected: bool,
}

impl DayMarking {
    pub fn has_incomplete(&self) -> bool {
        self.periods.iter().any(|p| p.color == PeriodColor::Incomplete)
    }
}

pub type Markings = BTreeMap<NaiveDate, DayMarking>;

/// Build the marking map for `tasks` with `selected` highlighted.
///
/// Every date from a task's start day through its end day inclusive gets one
/// period for that task. An inverted range contributes nothing. The selection
/// flag is applied last and leaves existing periods in place.
pub fn build_markings(tasks: &[Task], selected: NaiveDate) -> Markings {
    let mut markings = Markings::new();

    for task in tasks {
        let start = task.start_day();
        let end = task.end_day();
        let color = PeriodColor::for_task(task);

        for day in start.iter_days().take_while(|d| *d <= end) {
            markings.entry(day).or_default().periods.push(Period {
                task_id: task.id,
                starting_day: day == start,
                ending_day: day == end,
                color,
            });
        }
    }

    markings.entry(selected).or_default().selected = true;
    markings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: i64, start: NaiveDate, end: NaiveDate, completed: bool) -> Task {
        Task {
            id,
            title: format!("task {}", id),
            completed,
            start_date: start.and_hms_opt(10, 0, 0).unwrap(),
            end_date: end.and_hms_opt(8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn multi_day_task_marks_first_and_last_day() {
        let tasks = vec![task(1, date(2025, 6, 30), date(2025, 7, 2), false)];
        let markings = build_markings(&tasks, date(2025, 7, 20));

        let first = &markings[&date(2025, 6, 30)].periods[0];
        assert!(first.starting_day && !first.ending_day);

        let middle = &markings[&date(2025, 7, 1)].periods[0];
        assert!(!middle.starting_day && !middle.ending_day);

        let last = &markings[&date(2025, 7, 2)].periods[0];
        assert!(!last.starting_day && last.ending_day);
        assert_eq!(last.color, PeriodColor::Incomplete);
    }

    #[test]
    fn single_day_task_is_both_first_and_last() {
        let tasks = vec![task(4, date(2025, 7, 9), date(2025, 7, 9), true)];
        let markings = build_markings(&tasks, date(2025, 7, 1));
        let period = &markings[&date(2025, 7, 9)].periods[0];
        assert!(period.starting_day && period.ending_day);
        assert_eq!(period.color, PeriodColor::Complete);
    }

    #[test]
    fn overlapping_tasks_accumulate_periods() {
        let tasks = vec![
            task(1, date(2025, 7, 14), date(2025, 7, 15), false),
            task(2, date(2025, 7, 15), date(2025, 7, 16), true),
        ];
        let markings = build_markings(&tasks, date(2025, 7, 1));
        let day = &markings[&date(2025, 7, 15)];
        assert_eq!(day.periods.len(), 2);
        assert_eq!(day.periods[0].task_id, 1);
        assert_eq!(day.periods[1].task_id, 2);
        assert_eq!(day.periods[1].color, PeriodColor::Complete);
    }

    #[test]
    fn selection_overlays_task_periods() {
        let tasks = vec![task(1, date(2025, 7, 15), date(2025, 7, 15), false)];
        let markings = build_markings(&tasks, date(2025, 7, 15));
        let day = &markings[&date(2025, 7, 15)];
        assert!(day.selected);
        assert_eq!(day.periods.len(), 1);

        let empty = build_markings(&[], date(2025, 7, 3));
        assert_eq!(empty.len(), 1);
        assert!(empty[&date(2025, 7, 3)].selected);
        assert!(empty[&date(2025, 7, 3)].periods.is_empty());
    }

    #[test]
    fn inverted_range_contributes_no_periods() {
        let tasks = vec![task(1, date(2025, 7, 10), date(2025, 7, 5), false)];
        let markings = build_markings(&tasks, date(2025, 7, 1));
        assert!(markings.values().all(|m| m.periods.is_empty()));
    }
}
