use chrono::NaiveDate;
use tempfile::TempDir;
use warayaki::Database;

#[test]
fn reopening_keeps_data_and_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("tasks.db");
    let start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();

    let id = {
        let db = Database::new(&path).unwrap();
        db.register_user("yuki", "pw").unwrap();
        db.create_task("Persisted", start, end).unwrap()
    };

    let db = Database::new(&path).unwrap();
    db.initialize_schema().unwrap();
    assert_eq!(db.get_task(id).unwrap().unwrap().title, "Persisted");
    assert!(db.authenticate("yuki", "pw"));
}

#[test]
fn schema_setup_is_idempotent() {
    let db = Database::open_in_memory().unwrap();
    db.initialize_schema().unwrap();
    db.initialize_schema().unwrap();

    let tables: i64 = db
        .conn()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'tasks')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 2);
}
