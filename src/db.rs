use std::{
    ops::{Deref, DerefMut},
    str::FromStr,
};

use anyhow::Context;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Executor, Sqlite, SqliteConnection, SqlitePool,
};
use tracing::{info, trace};

use crate::{
    config::DatabaseTarget, error::ApiError, permits::repo_types::PermitApplicationRow,
    state::AppState, users::repo_types::UserRow,
};

/// DDL for one table: the table itself plus its indexes and triggers.
#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    pub table: &'static str,
    pub ddl: &'static str,
}

/// A persisted record type. The same definition drives schema sync and the
/// column lists used by the repositories.
pub trait Entity {
    const TABLE: &'static str;
    const COLUMNS: &'static str;
    /// Must be idempotent (`IF NOT EXISTS` everywhere).
    const DDL: &'static str;

    const SCHEMA: EntitySchema = EntitySchema {
        table: Self::TABLE,
        ddl: Self::DDL,
    };
}

/// Every entity, in foreign key order.
pub const ENTITIES: &[EntitySchema] = &[UserRow::SCHEMA, PermitApplicationRow::SCHEMA];

pub async fn connect(target: &DatabaseTarget) -> anyhow::Result<SqlitePool> {
    let (options, pool) = match target {
        DatabaseTarget::File(path) => (
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true),
            SqlitePoolOptions::new().max_connections(10),
        ),
        // an in-memory database dies with its last connection, so keep exactly one alive
        DatabaseTarget::Memory => (
            SqliteConnectOptions::from_str("sqlite::memory:")?,
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
        ),
    };

    let db = pool
        .connect_with(options.foreign_keys(true))
        .await
        .with_context(|| format!("connect to {target}"))?;
    info!(database = %target, "database connected");
    Ok(db)
}

/// Creates whatever is missing. Never alters or drops existing objects.
pub async fn sync_schema(db: &SqlitePool) -> anyhow::Result<()> {
    for entity in ENTITIES {
        db.execute(entity.ddl)
            .await
            .with_context(|| format!("sync schema for table {}", entity.table))?;
        trace!(table = entity.table, "table synchronized");
    }
    info!(tables = ENTITIES.len(), "schema synchronized");
    Ok(())
}

/// A pooled connection owned by a single request. It goes back to the pool
/// when the handler returns, whatever the outcome.
pub struct DbSession(PoolConnection<Sqlite>);

#[async_trait]
impl FromRequestParts<AppState> for DbSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let conn = state
            .db
            .acquire()
            .await
            .context("acquire database session")?;
        trace!("database session opened");
        Ok(DbSession(conn))
    }
}

impl Deref for DbSession {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DbSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Drop for DbSession {
    fn drop(&mut self) {
        trace!("database session released");
    }
}
