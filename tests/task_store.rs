use chrono::{NaiveDate, NaiveDateTime};
use warayaki::Database;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let db = Database::open_in_memory().unwrap();
    let id = db.create_task("Dentist", at(2025, 7, 3, 14, 30), at(2025, 7, 3, 15, 0)).unwrap();

    let task = db.get_task(id).unwrap().unwrap();
    assert_eq!(task.id, id);
    assert_eq!(task.title, "Dentist");
    assert!(!task.completed);
    assert_eq!(task.start_date, at(2025, 7, 3, 14, 30));
    assert_eq!(task.end_date, at(2025, 7, 3, 15, 0));
}

#[test]
fn ids_are_distinct() {
    let db = Database::open_in_memory().unwrap();
    let a = db.create_task("A", at(2025, 7, 1, 9, 0), at(2025, 7, 1, 10, 0)).unwrap();
    let b = db.create_task("A", at(2025, 7, 1, 9, 0), at(2025, 7, 1, 10, 0)).unwrap();
    assert_ne!(a, b);
}

#[test]
fn task_crossing_month_boundary_is_in_both_months() {
    let db = Database::open_in_memory().unwrap();
    let id = db.create_task("Trip", at(2025, 6, 30, 8, 0), at(2025, 7, 2, 20, 0)).unwrap();

    let june = db.tasks_overlapping_month(2025, 6).unwrap();
    let july = db.tasks_overlapping_month(2025, 7).unwrap();
    assert!(june.iter().any(|t| t.id == id));
    assert!(july.iter().any(|t| t.id == id));
    assert!(db.tasks_overlapping_month(2025, 8).unwrap().is_empty());
}

#[test]
fn date_query_uses_whole_days() {
    let db = Database::open_in_memory().unwrap();
    let id = db.create_task("Late", at(2025, 7, 1, 23, 30), at(2025, 7, 2, 0, 15)).unwrap();

    for d in [day(2025, 7, 1), day(2025, 7, 2)] {
        let tasks = db.tasks_overlapping_date(d).unwrap();
        assert_eq!(tasks.len(), 1, "expected task on {}", d);
        assert_eq!(tasks[0].id, id);
    }
    assert!(db.tasks_overlapping_date(day(2025, 6, 30)).unwrap().is_empty());
    assert!(db.tasks_overlapping_date(day(2025, 7, 3)).unwrap().is_empty());
}

#[test]
fn results_ordered_by_start() {
    let db = Database::open_in_memory().unwrap();
    let late = db.create_task("Late", at(2025, 7, 15, 17, 0), at(2025, 7, 15, 18, 0)).unwrap();
    let early = db.create_task("Early", at(2025, 7, 15, 8, 0), at(2025, 7, 15, 9, 0)).unwrap();
    let long = db.create_task("Week", at(2025, 7, 10, 9, 0), at(2025, 7, 20, 9, 0)).unwrap();

    let ids: Vec<i64> = db
        .tasks_overlapping_date(day(2025, 7, 15))
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![long, early, late]);
}

#[test]
fn update_replaces_title_and_dates() {
    let db = Database::open_in_memory().unwrap();
    let id = db.create_task("Draft", at(2025, 7, 1, 9, 0), at(2025, 7, 1, 10, 0)).unwrap();
    db.set_task_completed(id, true).unwrap();

    let rows = db.update_task(id, "Final", at(2025, 7, 4, 9, 0), at(2025, 7, 5, 10, 0)).unwrap();
    assert_eq!(rows, 1);

    let task = db.get_task(id).unwrap().unwrap();
    assert_eq!(task.title, "Final");
    assert_eq!(task.start_day(), day(2025, 7, 4));
    assert_eq!(task.end_day(), day(2025, 7, 5));
    assert!(task.completed, "update must not touch the completion flag");
    assert!(db.tasks_overlapping_date(day(2025, 7, 1)).unwrap().is_empty());
}

#[test]
fn writes_on_missing_id_change_nothing() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.update_task(42, "x", at(2025, 7, 1, 9, 0), at(2025, 7, 1, 10, 0)).unwrap(), 0);
    assert_eq!(db.set_task_completed(42, true).unwrap(), 0);
    assert_eq!(db.delete_task(42).unwrap(), 0);
    assert!(db.get_task(42).unwrap().is_none());
}

#[test]
fn toggle_completion_both_ways() {
    let db = Database::open_in_memory().unwrap();
    let id = db.create_task("Laundry", at(2025, 7, 6, 9, 0), at(2025, 7, 6, 10, 0)).unwrap();

    db.set_task_completed(id, true).unwrap();
    let done = db.get_task(id).unwrap().unwrap();
    assert!(done.completed);
    assert_eq!(done.title, "Laundry");
    assert_eq!(done.start_date, at(2025, 7, 6, 9, 0));
    assert_eq!(done.end_date, at(2025, 7, 6, 10, 0));

    db.set_task_completed(id, false).unwrap();
    let undone = db.get_task(id).unwrap().unwrap();
    assert!(!undone.completed);
    assert_eq!(undone.title, "Laundry");
    assert_eq!(undone.start_date, at(2025, 7, 6, 9, 0));
    assert_eq!(undone.end_date, at(2025, 7, 6, 10, 0));
}

#[test]
fn delete_removes_from_queries() {
    let db = Database::open_in_memory().unwrap();
    let id = db.create_task("Gone", at(2025, 7, 6, 9, 0), at(2025, 7, 6, 10, 0)).unwrap();
    assert_eq!(db.delete_task(id).unwrap(), 1);
    assert!(db.get_task(id).unwrap().is_none());
    assert!(db.tasks_overlapping_month(2025, 7).unwrap().is_empty());
}

#[test]
fn inverted_range_matches_month_but_no_day() {
    let db = Database::open_in_memory().unwrap();
    let id = db.create_task("Backwards", at(2025, 7, 10, 9, 0), at(2025, 7, 5, 9, 0)).unwrap();

    assert!(db.tasks_overlapping_month(2025, 7).unwrap().iter().any(|t| t.id == id));
    for d in 1..=31 {
        assert!(db.tasks_overlapping_date(day(2025, 7, d)).unwrap().is_empty());
    }
}

#[test]
fn invalid_month_is_an_error() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.tasks_overlapping_month(2025, 13).is_err());
}
