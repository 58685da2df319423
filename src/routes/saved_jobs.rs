use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::saved_job_dto::SaveJobPayload,
    error::Result,
    extract::{AppJson, AppPath},
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/saved-jobs",
    responses(
        (status = 200, description = "Saved jobs, most recently saved first", body = Json<Vec<crate::models::job::JobWithCompany>>)
    )
)]
#[axum::debug_handler]
pub async fn list_saved_jobs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let jobs = state.saved_job_service.list_for_user(&auth.user_id).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    post,
    path = "/api/saved-jobs",
    request_body = SaveJobPayload,
    responses(
        (status = 201, description = "Job saved", body = Json<crate::models::saved_job::SavedJob>),
        (status = 400, description = "Invalid payload or already saved"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn save_job(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppJson(payload): AppJson<SaveJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let saved = state
        .saved_job_service
        .save(&auth.user_id, payload.job_id)
        .await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

#[utoipa::path(
    delete,
    path = "/api/saved-jobs/{job_id}",
    params(
        ("job_id" = i32, Path, description = "Job ID")
    ),
    responses(
        (status = 204, description = "Job unsaved")
    )
)]
#[axum::debug_handler]
pub async fn unsave_job(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppPath(job_id): AppPath<i32>,
) -> Result<impl IntoResponse> {
    state.saved_job_service.unsave(&auth.user_id, job_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
