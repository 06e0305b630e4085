use sqlx::SqliteConnection;
use tracing::debug;

use crate::users::{
    dto::{User, UserCreate},
    repo::UserRepo,
    repo_types::NewUser,
};

pub async fn create_user(conn: &mut SqliteConnection, input: UserCreate) -> anyhow::Result<User> {
    let row = conn
        .insert_user(NewUser {
            username: &input.username,
            email: &input.email,
            password: &input.password,
        })
        .await?;
    debug!(user_id = row.id, "user stored");
    Ok(row.into())
}

/// `None` when no user has this id.
pub async fn get_user(conn: &mut SqliteConnection, id: i64) -> anyhow::Result<Option<User>> {
    Ok(conn.find_user(id).await?.map(User::from))
}
