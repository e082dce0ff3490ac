//! Profile management: CRUD, activation, single-field saves.
//!
//! Ownership is checked before every mutation; a profile belonging to a
//! different user is rejected as `NotAuthorized` before anything is
//! touched.

use sqlx::SqlitePool;

use crate::database::models::{Profile, ProfileData};
use crate::database::profile_repo;
use crate::types::errors::{AppError, AppResult};

/// Load a profile and verify the caller owns it.
async fn get_owned_profile(
    pool: &SqlitePool,
    user_id: &str,
    profile_id: &str,
) -> AppResult<Profile> {
    let profile = profile_repo::get_profile_by_id(pool, profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {profile_id} not found")))?;

    if profile.user_id != user_id {
        return Err(AppError::NotAuthorized(
            "Profile belongs to a different user".to_string(),
        ));
    }
    Ok(profile)
}

/// Create a profile. Name is required; data may be empty.
pub async fn create_profile(
    pool: &SqlitePool,
    user_id: &str,
    name: &str,
    data: &ProfileData,
) -> AppResult<Profile> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Please add a profile name".to_string(),
        ));
    }
    Ok(profile_repo::insert_profile(pool, user_id, name.trim(), data).await?)
}

/// All profiles owned by the user.
pub async fn list_profiles(pool: &SqlitePool, user_id: &str) -> AppResult<Vec<Profile>> {
    Ok(profile_repo::get_profiles_for_user(pool, user_id).await?)
}

/// Bulk replace of a profile's name and data.
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: &str,
    profile_id: &str,
    name: &str,
    data: &ProfileData,
) -> AppResult<Profile> {
    get_owned_profile(pool, user_id, profile_id).await?;

    if name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Please add a profile name".to_string(),
        ));
    }

    profile_repo::update_profile(pool, profile_id, name.trim(), data).await?;
    get_owned_profile(pool, user_id, profile_id).await
}

/// Delete a profile the user owns.
pub async fn delete_profile(pool: &SqlitePool, user_id: &str, profile_id: &str) -> AppResult<()> {
    get_owned_profile(pool, user_id, profile_id).await?;
    profile_repo::delete_profile(pool, profile_id).await?;
    Ok(())
}

/// Make the given profile the user's single active one.
pub async fn activate_profile(
    pool: &SqlitePool,
    user_id: &str,
    profile_id: &str,
) -> AppResult<Profile> {
    get_owned_profile(pool, user_id, profile_id).await?;

    if !profile_repo::set_active_profile(pool, user_id, profile_id).await? {
        return Err(AppError::NotFound(format!("Profile {profile_id} not found")));
    }
    get_owned_profile(pool, user_id, profile_id).await
}

/// Upsert a single field into the active profile's data.
/// Fails with `NoActiveProfile` when the user has none.
pub async fn save_field(
    pool: &SqlitePool,
    user_id: &str,
    key: &str,
    value: &str,
) -> AppResult<Profile> {
    if key.trim().is_empty() {
        return Err(AppError::InvalidInput("Please add a field key".to_string()));
    }

    let mut profile = profile_repo::get_active_profile(pool, user_id)
        .await?
        .ok_or(AppError::NoActiveProfile)?;

    profile.data.insert(
        key.trim().to_string(),
        serde_json::Value::String(value.to_string()),
    );
    profile_repo::update_profile_data(pool, &profile.id, &profile.data).await?;
    Ok(profile)
}

/// Keys of the active profile's data, in stored order. Empty when no
/// profile is active.
pub async fn active_profile_keys(pool: &SqlitePool, user_id: &str) -> AppResult<Vec<String>> {
    let Some(profile) = profile_repo::get_active_profile(pool, user_id).await? else {
        return Ok(Vec::new());
    };
    Ok(profile.data.keys().cloned().collect())
}

#[cfg(test)]
#[path = "tests/profile_service_tests.rs"]
mod tests;
