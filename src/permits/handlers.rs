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
    permits::{dto::PermitApplicationCreate, services},
    state::AppState,
};

pub fn permit_routes() -> Router<AppState> {
    Router::new()
        .route("/permits", post(create_permit_application))
        .route("/permits/", post(create_permit_application))
        .route("/permits/:id", get(get_permit_application))
}

/// POST /api/permits/
#[instrument(skip(session, payload))]
pub async fn create_permit_application(
    mut session: DbSession,
    ValidJson(payload): ValidJson<PermitApplicationCreate>,
) -> Result<impl IntoResponse, ApiError> {
    let permit = services::create_permit_application(&mut session, payload).await?;

    info!(permit_id = permit.id, permit_type = %permit.permit_type, "permit application created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/permits/{}", permit.id))],
        Json(permit),
    ))
}

/// GET /api/permits/{id}
#[instrument(skip(session))]
pub async fn get_permit_application(
    mut session: DbSession,
    ValidPath(id): ValidPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    services::get_permit_application(&mut session, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Permit application not found"))
}
