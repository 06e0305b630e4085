use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    db::DbSession,
    error::ApiError,
    extractors::{ValidJson, ValidPath},
    permits,
    state::AppState,
    users::{dto::UserCreate, services},
};

const USER_NOT_FOUND: &str = "User not found";

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/", post(create_user))
        .route("/users/:id", get(get_user))
        .route("/users/:id/permits", get(list_user_permits))
}

/// POST /api/users/
#[instrument(skip(session, payload))]
pub async fn create_user(
    mut session: DbSession,
    ValidJson(payload): ValidJson<UserCreate>,
) -> Result<impl IntoResponse, ApiError> {
    let user = services::create_user(&mut session, payload).await?;

    info!(user_id = user.id, username = %user.username, "user created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/users/{}", user.id))],
        Json(user),
    ))
}

/// GET /api/users/{id}
#[instrument(skip(session))]
pub async fn get_user(
    mut session: DbSession,
    ValidPath(id): ValidPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    services::get_user(&mut session, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(USER_NOT_FOUND))
}

/// GET /api/users/{id}/permits
#[instrument(skip(session))]
pub async fn list_user_permits(
    mut session: DbSession,
    ValidPath(id): ValidPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if services::get_user(&mut session, id).await?.is_none() {
        return Err(ApiError::NotFound(USER_NOT_FOUND));
    }
    let permits = permits::services::list_user_permit_applications(&mut session, id).await?;
    Ok(Json(permits))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use crate::test_support::{send, test_app};

    fn ana() -> Value {
        json!({"username": "ana", "email": "ana@example.org", "password": "hunter22"})
    }

    #[tokio::test]
    async fn create_hides_password() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, Method::POST, "/api/users/", Some(ana())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["username"], "ana");
        assert_eq!(body["email"], "ana@example.org");
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn get_round_trips_and_unknown_is_404() {
        let (app, _) = test_app().await;
        let (_, created) = send(&app, Method::POST, "/api/users", Some(ana())).await;

        let (status, fetched) = send(&app, Method::GET, "/api/users/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, body) = send(&app, Method::GET, "/api/users/7", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "User not found"}));
    }

    #[tokio::test]
    async fn duplicate_username_is_a_server_error_without_second_row() {
        let (app, state) = test_app().await;
        send(&app, Method::POST, "/api/users/", Some(ana())).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users/",
            Some(json!({"username": "ana", "email": "other@example.org", "password": "x"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"detail": "Internal Server Error"}));
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn missing_fields_are_unprocessable() {
        let (app, _) = test_app().await;

        let (status, _) =
            send(&app, Method::POST, "/api/users/", Some(json!({"username": "ana"}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn lists_only_the_users_permits() {
        let (app, state) = test_app().await;
        send(&app, Method::POST, "/api/users/", Some(ana())).await;
        send(&app, Method::POST, "/api/permits/", Some(json!({"permit_type": "parking"}))).await;
        sqlx::query("INSERT INTO permit_applications (user_id, permit_type, status) VALUES (1, 'building', 'pending')")
            .execute(&state.db)
            .await
            .unwrap();

        let (status, body) = send(&app, Method::GET, "/api/users/1/permits", None).await;

        assert_eq!(status, StatusCode::OK);
        let permits = body.as_array().unwrap();
        assert_eq!(permits.len(), 1);
        assert_eq!(permits[0]["permit_type"], "building");
        assert_eq!(permits[0]["user_id"], 1);
    }

    #[tokio::test]
    async fn permits_of_unknown_user_is_404() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/users/5/permits", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "User not found");
    }
}
