use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::database::mapping_repo;
use crate::database::models::{FieldMapping, MappingWritePolicy};
use crate::services::matcher::learning;
use crate::types::errors::{AppError, AppResult};

use super::{AppState, AuthUser};

#[derive(Debug, Deserialize)]
pub struct MappingRequest {
    pub form_label: String,
    pub mapped_key: String,
}

#[derive(Debug, Serialize)]
pub struct LearnResponse {
    pub value: Option<String>,
}

fn validate(body: &MappingRequest) -> AppResult<()> {
    if body.form_label.trim().is_empty() || body.mapped_key.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Please add a form label and mapped key".to_string(),
        ));
    }
    Ok(())
}

async fn list_mappings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<FieldMapping>>> {
    let mappings = mapping_repo::get_mappings_for_user(&state.pool, &user_id).await?;
    Ok(Json(mappings))
}

async fn create_mapping(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<MappingRequest>,
) -> AppResult<(StatusCode, Json<FieldMapping>)> {
    validate(&body)?;

    match state.mapping_policy {
        MappingWritePolicy::Upsert => {
            let mapping = mapping_repo::upsert_mapping(
                &state.pool,
                &user_id,
                &body.form_label,
                &body.mapped_key,
            )
            .await?;
            Ok((StatusCode::OK, Json(mapping)))
        }
        MappingWritePolicy::CreateOnly => {
            let mapping = mapping_repo::insert_mapping(
                &state.pool,
                &user_id,
                &body.form_label,
                &body.mapped_key,
            )
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!(
                    "A mapping for {:?} already exists",
                    body.form_label
                ))
            })?;
            Ok((StatusCode::CREATED, Json(mapping)))
        }
    }
}

/// Persist a mapping and immediately re-resolve the label: the learning
/// protocol's persist+reconcile steps as one wire call.
async fn learn_mapping(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<MappingRequest>,
) -> AppResult<Json<LearnResponse>> {
    validate(&body)?;
    let value =
        learning::learn_and_resolve(&state.pool, &user_id, &body.form_label, &body.mapped_key)
            .await?;
    Ok(Json(LearnResponse { value }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_mappings).post(create_mapping))
        .route("/learn", post(learn_mapping))
}
