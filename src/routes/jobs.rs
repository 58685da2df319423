use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::job_dto::{CreateJobPayload, JobListQuery},
    error::Result,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("location" = Option<String>, Query, description = "Case-insensitive location substring"),
        ("type" = Option<String>, Query, description = "Exact job type"),
        ("salaryMin" = Option<String>, Query, description = "Minimum salary floor"),
        ("keywords" = Option<String>, Query, description = "Matched against title and description"),
        ("limit" = Option<i64>, Query, description = "Page size, at most 100"),
        ("offset" = Option<i64>, Query, description = "Rows to skip")
    ),
    responses(
        (status = 200, description = "Active jobs with saved/applied flags", body = Json<Vec<crate::models::job::JobWithCompany>>),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppQuery(query): AppQuery<JobListQuery>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list_for_user(&auth.user_id, query).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = i32, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found", body = Json<crate::models::job::JobWithCompany>),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get_by_id(id).await?;
    Ok(Json(job))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created", body = Json<crate::models::job::Job>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}
