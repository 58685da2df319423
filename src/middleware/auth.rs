use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::AppState;

/// Identity claims carried by the bearer token. `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// The authenticated caller, available to handlers as an extension.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

fn unauthorized(code: &'static str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response()
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or("missing_authorization")?;
    let value = header.to_str().map_err(|_| "bad_authorization")?;
    value.strip_prefix("Bearer ").ok_or("unsupported_scheme")
}

pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, &'static str> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| "invalid_token")
}

/// Rejects requests without a valid bearer token. On success the user row is
/// created or refreshed from the claims and `AuthUser` is attached.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let claims = match bearer_token(req.headers())
        .and_then(|token| decode_claims(token, &state.config.jwt_secret))
    {
        Ok(claims) => claims,
        Err(code) => return unauthorized(code),
    };

    if let Err(err) = state.user_service.upsert(&claims).await {
        tracing::error!(user_id = %claims.sub, error = ?err, "Failed to upsert authenticated user");
        return err.into_response();
    }

    req.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
    });
    next.run(req).await
}
