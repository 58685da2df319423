use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::job_alert_dto::CreateJobAlertPayload,
    error::Result,
    extract::{AppJson, AppPath},
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/job-alerts",
    responses(
        (status = 200, description = "The caller's job alerts", body = Json<Vec<crate::models::job_alert::JobAlert>>)
    )
)]
#[axum::debug_handler]
pub async fn list_job_alerts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let alerts = state.job_alert_service.list_for_user(&auth.user_id).await?;
    Ok(Json(alerts))
}

#[utoipa::path(
    post,
    path = "/api/job-alerts",
    request_body = CreateJobAlertPayload,
    responses(
        (status = 201, description = "Job alert created", body = Json<crate::models::job_alert::JobAlert>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_job_alert(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppJson(payload): AppJson<CreateJobAlertPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let alert = state.job_alert_service.create(&auth.user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

#[utoipa::path(
    delete,
    path = "/api/job-alerts/{id}",
    params(
        ("id" = i32, Path, description = "Job alert ID")
    ),
    responses(
        (status = 204, description = "Job alert deleted"),
        (status = 404, description = "Job alert not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job_alert(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse> {
    state.job_alert_service.delete(id, &auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
