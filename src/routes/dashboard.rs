use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{error::Result, middleware::auth::AuthUser, AppState};

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Application and saved-job counters", body = Json<crate::dto::dashboard_dto::DashboardStats>)
    )
)]
#[axum::debug_handler]
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let stats = state.dashboard_service.stats(&auth.user_id).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/activity",
    responses(
        (status = 200, description = "Ten most recent applications and saves", body = Json<Vec<crate::dto::dashboard_dto::ActivityItem>>)
    )
)]
#[axum::debug_handler]
pub async fn get_recent_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let activity = state.dashboard_service.recent_activity(&auth.user_id).await?;
    Ok(Json(activity))
}
