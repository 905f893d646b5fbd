//! Integration tests for the database layer.
//!
//! These tests verify the core database operations using an in-memory SQLite database.
//! Tests are organized by module and functionality.

use chrono::{DateTime, Utc};
use taskpad::db::Database;
use taskpad::error::{ApiError, ErrorCode};
use taskpad::types::{Category, NewTask, Priority, TaskUpdate, User};

/// Helper to create a fresh in-memory database for testing.
fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

fn create_user(db: &Database, email: &str) -> User {
    db.create_user("Test User", email, "$argon2id$not-a-real-hash")
        .expect("Failed to create user")
}

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: None,
        category: Category::Personal,
        priority: Priority::Medium,
        due_date: None,
    }
}

fn due(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

mod user_tests {
    use super::*;

    #[test]
    fn create_user_round_trips() {
        let db = setup_db();
        let user = create_user(&db, "ada@example.com");

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.created_at, user.updated_at);

        let fetched = db.get_user(&user.id).unwrap().unwrap();
        assert_eq!(fetched, user);
        assert_eq!(
            db.get_user_by_email("ada@example.com").unwrap(),
            Some(user)
        );
    }

    #[test]
    fn duplicate_email_is_already_exists() {
        let db = setup_db();
        create_user(&db, "ada@example.com");

        let err = db
            .create_user("Other", "ada@example.com", "hash")
            .expect_err("duplicate email should fail");
        let api: ApiError = err.into();
        assert_eq!(api.code, ErrorCode::AlreadyExists);
        assert_eq!(api.message, "User already exists with this email");
    }

    #[test]
    fn find_credentials_returns_hash() {
        let db = setup_db();
        let user = create_user(&db, "ada@example.com");

        let (found, hash) = db.find_credentials("ada@example.com").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(hash, "$argon2id$not-a-real-hash");

        assert!(db.find_credentials("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn unknown_user_is_none() {
        let db = setup_db();
        assert!(db.get_user("missing").unwrap().is_none());
    }
}

mod session_tests {
    use super::*;

    #[test]
    fn session_resolves_to_user() {
        let db = setup_db();
        let user = create_user(&db, "ada@example.com");

        let session = db.create_session(&user.id, 3600).unwrap();
        assert_eq!(session.user_id, user.id);
        assert!(session.expires_at > session.created_at);
        assert_eq!(
            db.resolve_session(&session.token).unwrap(),
            Some(user.id.clone())
        );
    }

    #[test]
    fn expired_session_is_rejected_and_purged() {
        let db = setup_db();
        let user = create_user(&db, "ada@example.com");

        let session = db.create_session(&user.id, 0).unwrap();
        assert_eq!(db.resolve_session(&session.token).unwrap(), None);
        assert_eq!(db.purge_expired_sessions().unwrap(), 1);
        assert!(!db.delete_session(&session.token).unwrap());
    }

    #[test]
    fn deleted_session_no_longer_resolves() {
        let db = setup_db();
        let user = create_user(&db, "ada@example.com");
        let session = db.create_session(&user.id, 3600).unwrap();

        assert!(db.delete_session(&session.token).unwrap());
        assert_eq!(db.resolve_session(&session.token).unwrap(), None);
    }

    #[test]
    fn huge_ttl_is_capped_not_overflowed() {
        let db = setup_db();
        let user = create_user(&db, "ada@example.com");

        let session = db.create_session(&user.id, i64::MAX).unwrap();
        assert!(session.expires_at > session.created_at);
        assert_eq!(
            (session.expires_at - session.created_at).num_seconds(),
            taskpad::db::sessions::MAX_SESSION_TTL_SECONDS
        );
        assert_eq!(db.resolve_session(&session.token).unwrap(), Some(user.id));
    }

    #[test]
    fn unknown_token_is_none() {
        let db = setup_db();
        assert_eq!(db.resolve_session("nope").unwrap(), None);
    }
}

mod task_tests {
    use super::*;

    #[test]
    fn create_task_applies_defaults() {
        let db = setup_db();
        let user = create_user(&db, "ada@example.com");

        let task = db.create_task(&user.id, &new_task("Buy milk")).unwrap();
        assert_eq!(task.user_id, user.id);
        assert_eq!(task.title, "Buy milk");
        assert!(!task.completed);
        assert!(task.description.is_none());
        assert!(task.due_date.is_none());
        assert_eq!(db.get_task(&user.id, &task.id).unwrap(), Some(task));
    }

    #[test]
    fn create_task_keeps_all_fields() {
        let db = setup_db();
        let user = create_user(&db, "ada@example.com");

        let task = db
            .create_task(
                &user.id,
                &NewTask {
                    title: "Quarterly report".into(),
                    description: Some("Include sales figures".into()),
                    category: Category::Work,
                    priority: Priority::Urgent,
                    due_date: Some(due("2026-10-20T00:00:00Z")),
                },
            )
            .unwrap();

        let fetched = db.get_task(&user.id, &task.id).unwrap().unwrap();
        assert_eq!(fetched.category, Category::Work);
        assert_eq!(fetched.priority, Priority::Urgent);
        assert_eq!(fetched.description.as_deref(), Some("Include sales figures"));
        assert_eq!(fetched.due_date, Some(due("2026-10-20T00:00:00Z")));
    }

    #[test]
    fn list_tasks_newest_first() {
        let db = setup_db();
        let user = create_user(&db, "ada@example.com");

        db.create_task(&user.id, &new_task("first")).unwrap();
        db.create_task(&user.id, &new_task("second")).unwrap();
        db.create_task(&user.id, &new_task("third")).unwrap();

        let titles: Vec<String> = db
            .list_tasks(&user.id)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["third", "second", "first"]);
    }

    #[test]
    fn update_task_changes_only_given_fields() {
        let db = setup_db();
        let user = create_user(&db, "ada@example.com");
        let mut input = new_task("Draft");
        input.due_date = Some(due("2026-10-20T00:00:00Z"));
        input.description = Some("notes".into());
        let task = db.create_task(&user.id, &input).unwrap();

        let updated = db
            .update_task(
                &user.id,
                &task.id,
                &TaskUpdate {
                    title: Some("Final".into()),
                    due_date: Some(None),
                    ..TaskUpdate::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Final");
        assert_eq!(updated.due_date, None);
        assert_eq!(updated.description.as_deref(), Some("notes"));
        assert_eq!(updated.priority, Priority::Medium);
        assert!(updated.updated_at >= task.updated_at);
        assert_eq!(db.get_task(&user.id, &task.id).unwrap(), Some(updated));
    }

    #[test]
    fn toggle_flips_completion() {
        let db = setup_db();
        let user = create_user(&db, "ada@example.com");
        let task = db.create_task(&user.id, &new_task("Walk dog")).unwrap();

        let toggled = db.toggle_task(&user.id, &task.id).unwrap().unwrap();
        assert!(toggled.completed);
        let toggled = db.toggle_task(&user.id, &task.id).unwrap().unwrap();
        assert!(!toggled.completed);
    }

    #[test]
    fn delete_task_removes_it() {
        let db = setup_db();
        let user = create_user(&db, "ada@example.com");
        let task = db.create_task(&user.id, &new_task("Walk dog")).unwrap();

        assert!(db.delete_task(&user.id, &task.id).unwrap());
        assert!(db.get_task(&user.id, &task.id).unwrap().is_none());
        assert!(!db.delete_task(&user.id, &task.id).unwrap());
    }

    #[test]
    fn missing_task_operations_return_none() {
        let db = setup_db();
        let user = create_user(&db, "ada@example.com");

        assert!(db.get_task(&user.id, "missing").unwrap().is_none());
        assert!(db.toggle_task(&user.id, "missing").unwrap().is_none());
        assert!(
            db.update_task(
                &user.id,
                "missing",
                &TaskUpdate {
                    completed: Some(true),
                    ..TaskUpdate::default()
                }
            )
            .unwrap()
            .is_none()
        );
    }
}

mod ownership_tests {
    use super::*;

    #[test]
    fn other_users_tasks_are_invisible() {
        let db = setup_db();
        let ada = create_user(&db, "ada@example.com");
        let bob = create_user(&db, "bob@example.com");
        let task = db.create_task(&ada.id, &new_task("Private")).unwrap();

        assert!(db.list_tasks(&bob.id).unwrap().is_empty());
        assert!(db.get_task(&bob.id, &task.id).unwrap().is_none());
        assert!(db.toggle_task(&bob.id, &task.id).unwrap().is_none());
        assert!(
            db.update_task(
                &bob.id,
                &task.id,
                &TaskUpdate {
                    title: Some("Hijacked".into()),
                    ..TaskUpdate::default()
                }
            )
            .unwrap()
            .is_none()
        );
        assert!(!db.delete_task(&bob.id, &task.id).unwrap());

        // Untouched for the owner
        let still = db.get_task(&ada.id, &task.id).unwrap().unwrap();
        assert_eq!(still.title, "Private");
        assert!(!still.completed);
    }
}
