use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    dto::sync_dto::{SyncJobsPayload, SyncJobsResponse},
    error::Result,
    extract::AppJson,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/stepstone/sync",
    request_body = SyncJobsPayload,
    responses(
        (status = 200, description = "Postings ingested as jobs", body = Json<SyncJobsResponse>),
        (status = 502, description = "External feed unavailable")
    )
)]
#[axum::debug_handler]
pub async fn sync_stepstone_jobs(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SyncJobsPayload>,
) -> Result<impl IntoResponse> {
    let jobs = state.sync_service.sync(payload.into()).await?;
    Ok(Json(SyncJobsResponse {
        message: format!("Successfully synced {} jobs from Stepstone", jobs.len()),
        jobs,
    }))
}
