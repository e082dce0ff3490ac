//! HTTP surface for the autofill backend.
//!
//! One route module per resource; every protected handler receives the
//! authenticated user through the [`AuthUser`] extractor (bearer token
//! looked up in the sessions table).

pub mod auth_routes;
pub mod mapping_routes;
pub mod match_routes;
pub mod profile_routes;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};

use crate::database::models::MappingWritePolicy;
use crate::services::auth::auth_service;
use crate::types::errors::AppError;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub mapping_policy: MappingWritePolicy,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotAuthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) | AppError::NoActiveProfile => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("request failed: {self}");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

/// Authenticated user id, extracted from `Authorization: Bearer <token>`.
pub struct AuthUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::NotAuthorized("Missing bearer token".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::NotAuthorized("Missing bearer token".to_string()))?;

        let user_id = auth_service::authenticate(&state.pool, token).await?;
        Ok(AuthUser(user_id))
    }
}

/// Assemble the full application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", auth_routes::router())
        .nest("/api/profiles", profile_routes::router())
        .nest("/api/mappings", mapping_routes::router())
        .nest("/api/match", match_routes::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
