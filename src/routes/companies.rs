use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{dto::company_dto::CreateCompanyPayload, error::Result, extract::AppJson, AppState};

#[utoipa::path(
    get,
    path = "/api/companies",
    responses(
        (status = 200, description = "All companies", body = Json<Vec<crate::models::company::Company>>)
    )
)]
#[axum::debug_handler]
pub async fn list_companies(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let companies = state.company_service.list().await?;
    Ok(Json(companies))
}

#[utoipa::path(
    post,
    path = "/api/companies",
    request_body = CreateCompanyPayload,
    responses(
        (status = 201, description = "Company created", body = Json<crate::models::company::Company>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_company(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCompanyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let company = state.company_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(company)))
}
