use std::collections::HashMap;

use axum::{extract::State, response::Json, routing::post, Router};

use crate::services::matcher::engine;
use crate::types::errors::{AppError, AppResult};

use super::{AppState, AuthUser};

/// Pull the `labels` array out of the request body by hand so malformed
/// input is a 400, matching the original API ("Please provide an array
/// of labels") rather than a deserialization rejection.
fn parse_labels(body: &serde_json::Value) -> AppResult<Vec<String>> {
    let labels = body
        .get("labels")
        .and_then(|v| v.as_array())
        .ok_or_else(|| AppError::InvalidInput("Please provide an array of labels".to_string()))?;

    labels
        .iter()
        .map(|v| {
            v.as_str().map(|s| s.to_string()).ok_or_else(|| {
                AppError::InvalidInput("Labels must be strings".to_string())
            })
        })
        .collect()
}

async fn match_fields(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<HashMap<String, String>>> {
    let labels = parse_labels(&body)?;
    let matches = engine::resolve(&state.pool, &user_id, &labels).await?;
    Ok(Json(matches))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(match_fields))
}

#[cfg(test)]
#[path = "tests/match_routes_tests.rs"]
mod tests;
