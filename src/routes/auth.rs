use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{error::Result, middleware::auth::AuthUser, AppState};

#[utoipa::path(
    get,
    path = "/api/auth/user",
    responses(
        (status = 200, description = "The authenticated user", body = Json<crate::models::user::User>),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
#[axum::debug_handler]
pub async fn current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get(&auth.user_id).await?;
    Ok(Json(user))
}
