use anyhow::Context;
use async_trait::async_trait;
use sqlx::{Connection, SqliteConnection};

use crate::db::Entity;
use crate::permits::repo_types::{NewPermitApplication, PermitApplicationRow};

/// Storage operations on `permit_applications`.
#[async_trait]
pub trait PermitApplicationRepo {
    /// Insert and commit a new application, returning the stored row.
    async fn insert_permit_application(
        &mut self,
        new: NewPermitApplication<'_>,
    ) -> anyhow::Result<PermitApplicationRow>;

    /// Find an application by primary key.
    async fn find_permit_application(
        &mut self,
        id: i64,
    ) -> anyhow::Result<Option<PermitApplicationRow>>;

    /// All applications owned by a user, oldest first.
    async fn list_permit_applications_by_user(
        &mut self,
        user_id: i64,
    ) -> anyhow::Result<Vec<PermitApplicationRow>>;
}

#[async_trait]
impl PermitApplicationRepo for SqliteConnection {
    async fn insert_permit_application(
        &mut self,
        new: NewPermitApplication<'_>,
    ) -> anyhow::Result<PermitApplicationRow> {
        let sql = format!(
            "INSERT INTO {} (user_id, permit_type, status) VALUES (?, ?, ?) RETURNING {}",
            PermitApplicationRow::TABLE,
            PermitApplicationRow::COLUMNS,
        );

        let mut tx = self.begin().await.context("begin permit application insert")?;
        let row = sqlx::query_as::<_, PermitApplicationRow>(&sql)
            .bind(new.user_id)
            .bind(new.permit_type)
            .bind(new.status)
            .fetch_one(&mut *tx)
            .await
            .context("insert permit application")?;
        tx.commit().await.context("commit permit application")?;

        Ok(row)
    }

    async fn find_permit_application(
        &mut self,
        id: i64,
    ) -> anyhow::Result<Option<PermitApplicationRow>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?",
            PermitApplicationRow::COLUMNS,
            PermitApplicationRow::TABLE,
        );
        let row = sqlx::query_as::<_, PermitApplicationRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *self)
            .await
            .context("find permit application")?;
        Ok(row)
    }

    async fn list_permit_applications_by_user(
        &mut self,
        user_id: i64,
    ) -> anyhow::Result<Vec<PermitApplicationRow>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = ? ORDER BY id ASC",
            PermitApplicationRow::COLUMNS,
            PermitApplicationRow::TABLE,
        );
        let rows = sqlx::query_as::<_, PermitApplicationRow>(&sql)
            .bind(user_id)
            .fetch_all(&mut *self)
            .await
            .context("list permit applications by user")?;
        Ok(rows)
    }
}
