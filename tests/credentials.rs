use warayaki::{Database, RegisterError};

#[test]
fn register_then_authenticate() {
    let db = Database::open_in_memory().unwrap();
    db.register_user("haru", "pw1").unwrap();

    assert!(db.authenticate("haru", "pw1"));
    assert!(!db.authenticate("haru", "pw2"));
    assert!(!db.authenticate("nobody", "pw1"));
}

#[test]
fn duplicate_username_is_rejected() {
    let db = Database::open_in_memory().unwrap();
    db.register_user("haru", "pw1").unwrap();

    let err = db.register_user("haru", "other").unwrap_err();
    assert!(matches!(err, RegisterError::DuplicateUsername(ref name) if name == "haru"));
    assert_eq!(err.user_message(), "Registration failed: username already exists");

    // The original password still works
    assert!(db.authenticate("haru", "pw1"));
    assert!(!db.authenticate("haru", "other"));
}

#[test]
fn usernames_and_passwords_are_case_sensitive() {
    let db = Database::open_in_memory().unwrap();
    db.register_user("Haru", "Secret").unwrap();
    db.register_user("haru", "secret").unwrap();

    assert!(db.authenticate("Haru", "Secret"));
    assert!(!db.authenticate("Haru", "secret"));
    assert!(db.authenticate("haru", "secret"));
}

#[test]
fn get_user_returns_stored_row() {
    let db = Database::open_in_memory().unwrap();
    let id = db.register_user("sora", "pw").unwrap();

    let user = db.get_user("sora").unwrap().unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.username, "sora");
    assert!(db.get_user("kumo").unwrap().is_none());
}
