use anyhow::Context;
use async_trait::async_trait;
use sqlx::{Connection, SqliteConnection};

use crate::db::Entity;
use crate::users::repo_types::{NewUser, UserRow};

/// Storage operations on `users`.
#[async_trait]
pub trait UserRepo {
    /// Insert and commit a new user. Duplicate usernames or emails fail
    /// with the store's unique constraint error.
    async fn insert_user(&mut self, new: NewUser<'_>) -> anyhow::Result<UserRow>;

    async fn find_user(&mut self, id: i64) -> anyhow::Result<Option<UserRow>>;
}

#[async_trait]
impl UserRepo for SqliteConnection {
    async fn insert_user(&mut self, new: NewUser<'_>) -> anyhow::Result<UserRow> {
        let sql = format!(
            "INSERT INTO {} (username, email, password) VALUES (?, ?, ?) RETURNING {}",
            UserRow::TABLE,
            UserRow::COLUMNS,
        );

        let mut tx = self.begin().await.context("begin user insert")?;
        let user = sqlx::query_as::<_, UserRow>(&sql)
            .bind(new.username)
            .bind(new.email)
            .bind(new.password)
            .fetch_one(&mut *tx)
            .await
            .context("insert user")?;
        tx.commit().await.context("commit user")?;

        Ok(user)
    }

    async fn find_user(&mut self, id: i64) -> anyhow::Result<Option<UserRow>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?",
            UserRow::COLUMNS,
            UserRow::TABLE
        );
        let user = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *self)
            .await
            .context("find user")?;
        Ok(user)
    }
}
