use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::application_dto::{CreateApplicationPayload, UpdateApplicationStatusPayload},
    error::Result,
    extract::{AppJson, AppPath},
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/applications",
    responses(
        (status = 200, description = "The caller's applications, newest first", body = Json<Vec<crate::models::application::ApplicationWithJob>>)
    )
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let applications = state.application_service.list_for_user(&auth.user_id).await?;
    Ok(Json(applications))
}

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = CreateApplicationPayload,
    responses(
        (status = 201, description = "Application submitted", body = Json<crate::models::application::Application>),
        (status = 400, description = "Invalid payload or already applied"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn create_application(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppJson(payload): AppJson<CreateApplicationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state
        .application_service
        .create(&auth.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    patch,
    path = "/api/applications/{id}",
    params(
        ("id" = i32, Path, description = "Application ID")
    ),
    request_body = UpdateApplicationStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Json<crate::models::application::Application>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateApplicationStatusPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state
        .application_service
        .update_status(id, &auth.user_id, &payload.status)
        .await?;
    Ok(Json(application))
}
