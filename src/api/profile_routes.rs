use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::database::models::{Profile, ProfileData};
use crate::services::profiles::profile_service;
use crate::types::errors::AppResult;

use super::{AppState, AuthUser};

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub name: String,
    #[serde(default)]
    pub data: ProfileData,
}

#[derive(Debug, Deserialize)]
pub struct SaveFieldRequest {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: String,
}

async fn list_profiles(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Profile>>> {
    let profiles = profile_service::list_profiles(&state.pool, &user_id).await?;
    Ok(Json(profiles))
}

async fn create_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<ProfileRequest>,
) -> AppResult<(StatusCode, Json<Profile>)> {
    let profile =
        profile_service::create_profile(&state.pool, &user_id, &body.name, &body.data).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<ProfileRequest>,
) -> AppResult<Json<Profile>> {
    let profile =
        profile_service::update_profile(&state.pool, &user_id, &id, &body.name, &body.data).await?;
    Ok(Json(profile))
}

async fn delete_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<DeletedResponse>> {
    profile_service::delete_profile(&state.pool, &user_id, &id).await?;
    Ok(Json(DeletedResponse { id }))
}

async fn activate_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Profile>> {
    let profile = profile_service::activate_profile(&state.pool, &user_id, &id).await?;
    Ok(Json(profile))
}

async fn save_field(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<SaveFieldRequest>,
) -> AppResult<Json<Profile>> {
    let profile =
        profile_service::save_field(&state.pool, &user_id, &body.key, &body.value).await?;
    Ok(Json(profile))
}

async fn profile_keys(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<String>>> {
    let keys = profile_service::active_profile_keys(&state.pool, &user_id).await?;
    Ok(Json(keys))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_profiles).post(create_profile))
        .route("/keys", get(profile_keys))
        .route("/save-field", post(save_field))
        .route("/:id", put(update_profile).delete(delete_profile))
        .route("/:id/activate", put(activate_profile))
}
