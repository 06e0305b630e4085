use sqlx::FromRow;
use time::OffsetDateTime;

use crate::db::Entity;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String, // stored as given, never serialized
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Entity for UserRow {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static str = "id, username, email, password, created_at, updated_at";
    const DDL: &'static str = r#"
        CREATE TABLE IF NOT EXISTS users (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            username   TEXT NOT NULL,
            email      TEXT NOT NULL,
            password   TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );
        CREATE UNIQUE INDEX IF NOT EXISTS ix_users_username ON users (username);
        CREATE UNIQUE INDEX IF NOT EXISTS ix_users_email ON users (email);
        CREATE TRIGGER IF NOT EXISTS users_touch_updated_at
            AFTER UPDATE ON users
            FOR EACH ROW WHEN NEW.updated_at = OLD.updated_at
        BEGIN
            UPDATE users
               SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = NEW.id;
        END;
    "#;
}

#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}
