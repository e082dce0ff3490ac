use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};

use crate::services::auth::auth_service;
use crate::types::errors::AppResult;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = auth_service::register(&state.pool, &body.email, &body.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user.id,
            email: user.email,
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<Json<LoginResponse>> {
    let token = auth_service::login(&state.pool, &body.email, &body.password).await?;
    Ok(Json(LoginResponse { token }))
}

async fn logout(State(state): State<AppState>, token: BearerToken) -> AppResult<StatusCode> {
    // Reject unknown tokens with 401 instead of silently succeeding
    auth_service::authenticate(&state.pool, &token.0).await?;
    auth_service::logout(&state.pool, &token.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Raw bearer token, for logout.
pub struct BearerToken(pub String);

#[axum::async_trait]
impl axum::extract::FromRequestParts<AppState> for BearerToken {
    type Rejection = crate::types::errors::AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| BearerToken(t.to_string()))
            .ok_or_else(|| {
                crate::types::errors::AppError::NotAuthorized("Missing bearer token".to_string())
            })
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}
