use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::{
        resume_dto::{CreateResumePayload, UpdateResumePayload},
        MessageResponse,
    },
    error::Result,
    extract::{AppJson, AppPath},
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/resumes",
    responses(
        (status = 200, description = "The caller's resumes, most recently updated first", body = Json<Vec<crate::models::resume::Resume>>)
    )
)]
#[axum::debug_handler]
pub async fn list_resumes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let resumes = state.resume_service.list_for_user(&auth.user_id).await?;
    Ok(Json(resumes))
}

#[utoipa::path(
    post,
    path = "/api/resumes",
    request_body = CreateResumePayload,
    responses(
        (status = 200, description = "Resume created", body = Json<crate::models::resume::Resume>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_resume(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppJson(payload): AppJson<CreateResumePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let resume = state.resume_service.create(&auth.user_id, payload).await?;
    Ok(Json(resume))
}

#[utoipa::path(
    get,
    path = "/api/resumes/{id}",
    params(
        ("id" = i32, Path, description = "Resume ID")
    ),
    responses(
        (status = 200, description = "Resume found", body = Json<crate::models::resume::Resume>),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn get_resume(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse> {
    let resume = state.resume_service.get(id, &auth.user_id).await?;
    Ok(Json(resume))
}

#[utoipa::path(
    put,
    path = "/api/resumes/{id}",
    params(
        ("id" = i32, Path, description = "Resume ID")
    ),
    request_body = UpdateResumePayload,
    responses(
        (status = 200, description = "Resume updated", body = Json<crate::models::resume::Resume>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn update_resume(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateResumePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let resume = state
        .resume_service
        .update(id, &auth.user_id, payload)
        .await?;
    Ok(Json(resume))
}

#[utoipa::path(
    delete,
    path = "/api/resumes/{id}",
    params(
        ("id" = i32, Path, description = "Resume ID")
    ),
    responses(
        (status = 200, description = "Resume deleted", body = Json<MessageResponse>),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_resume(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse> {
    state.resume_service.delete(id, &auth.user_id).await?;
    Ok(Json(MessageResponse::new("Resume deleted successfully")))
}

#[utoipa::path(
    put,
    path = "/api/resumes/{id}/default",
    params(
        ("id" = i32, Path, description = "Resume ID")
    ),
    responses(
        (status = 200, description = "Default resume updated", body = Json<MessageResponse>),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn set_default_resume(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse> {
    state.resume_service.set_default(id, &auth.user_id).await?;
    Ok(Json(MessageResponse::new(
        "Default resume updated successfully",
    )))
}
