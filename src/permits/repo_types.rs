use sqlx::FromRow;
use time::OffsetDateTime;

use crate::db::Entity;

/// Status every application starts in.
pub const STATUS_PENDING: &str = "pending";

/// Permit application record in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PermitApplicationRow {
    pub id: i64,
    pub user_id: Option<i64>, // applicant, unset by the public create path
    pub permit_type: String,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Entity for PermitApplicationRow {
    const TABLE: &'static str = "permit_applications";
    const COLUMNS: &'static str = "id, user_id, permit_type, status, created_at, updated_at";
    const DDL: &'static str = r#"
        CREATE TABLE IF NOT EXISTS permit_applications (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER REFERENCES users (id),
            permit_type TEXT NOT NULL,
            status      TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );
        CREATE INDEX IF NOT EXISTS ix_permit_applications_user_id
            ON permit_applications (user_id);
        CREATE TRIGGER IF NOT EXISTS permit_applications_touch_updated_at
            AFTER UPDATE ON permit_applications
            FOR EACH ROW WHEN NEW.updated_at = OLD.updated_at
        BEGIN
            UPDATE permit_applications
               SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = NEW.id;
        END;
    "#;
}

/// Values supplied on insert; everything else is assigned by the store.
#[derive(Debug, Clone, Copy)]
pub struct NewPermitApplication<'a> {
    pub user_id: Option<i64>,
    pub permit_type: &'a str,
    pub status: &'a str,
}
