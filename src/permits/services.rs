use sqlx::SqliteConnection;
use tracing::debug;

use crate::permits::{
    dto::{PermitApplication, PermitApplicationCreate},
    repo::PermitApplicationRepo,
    repo_types::{NewPermitApplication, STATUS_PENDING},
};

/// Stores a new application in `pending` state and returns it with the
/// id and timestamps assigned by the store.
pub async fn create_permit_application(
    conn: &mut SqliteConnection,
    input: PermitApplicationCreate,
) -> anyhow::Result<PermitApplication> {
    let row = conn
        .insert_permit_application(NewPermitApplication {
            user_id: None,
            permit_type: &input.permit_type,
            status: STATUS_PENDING,
        })
        .await?;
    debug!(permit_id = row.id, "permit application stored");
    Ok(row.into())
}

/// `None` when no application has this id.
pub async fn get_permit_application(
    conn: &mut SqliteConnection,
    id: i64,
) -> anyhow::Result<Option<PermitApplication>> {
    Ok(conn
        .find_permit_application(id)
        .await?
        .map(PermitApplication::from))
}

pub async fn list_user_permit_applications(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> anyhow::Result<Vec<PermitApplication>> {
    let rows = conn.list_permit_applications_by_user(user_id).await?;
    Ok(rows.into_iter().map(PermitApplication::from).collect())
}
