use sqlx::SqlitePool;

use super::models::{Profile, ProfileData, ProfileRow};

fn parse_row(row: ProfileRow) -> Result<Profile, sqlx::Error> {
    Profile::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// Insert a new profile for a user. New profiles start inactive.
pub async fn insert_profile(
    pool: &SqlitePool,
    user_id: &str,
    name: &str,
    data: &ProfileData,
) -> Result<Profile, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = chrono::Utc::now().to_rfc3339();
    let data_json = serde_json::to_string(data).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    sqlx::query(
        "INSERT INTO profiles (id, user_id, name, data, is_active, created_at) VALUES (?, ?, ?, ?, 0, ?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(name)
    .bind(&data_json)
    .bind(&created_at)
    .execute(pool)
    .await?;

    Ok(Profile {
        id,
        user_id: user_id.to_string(),
        name: name.to_string(),
        data: data.clone(),
        is_active: false,
        created_at,
    })
}

/// Get all profiles belonging to a user.
pub async fn get_profiles_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<Profile>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ProfileRow>(
        "SELECT id, user_id, name, data, is_active, created_at FROM profiles WHERE user_id = ? ORDER BY created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(parse_row).collect()
}

/// Get a single profile by id, regardless of owner.
pub async fn get_profile_by_id(
    pool: &SqlitePool,
    profile_id: &str,
) -> Result<Option<Profile>, sqlx::Error> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "SELECT id, user_id, name, data, is_active, created_at FROM profiles WHERE id = ?",
    )
    .bind(profile_id)
    .fetch_optional(pool)
    .await?;

    row.map(parse_row).transpose()
}

/// Get the user's active profile, if any.
pub async fn get_active_profile(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<Profile>, sqlx::Error> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "SELECT id, user_id, name, data, is_active, created_at FROM profiles WHERE user_id = ? AND is_active = 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(parse_row).transpose()
}

/// Replace a profile's name and data.
pub async fn update_profile(
    pool: &SqlitePool,
    profile_id: &str,
    name: &str,
    data: &ProfileData,
) -> Result<(), sqlx::Error> {
    let data_json = serde_json::to_string(data).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    sqlx::query("UPDATE profiles SET name = ?, data = ? WHERE id = ?")
        .bind(name)
        .bind(&data_json)
        .bind(profile_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Overwrite only the data column of a profile.
pub async fn update_profile_data(
    pool: &SqlitePool,
    profile_id: &str,
    data: &ProfileData,
) -> Result<(), sqlx::Error> {
    let data_json = serde_json::to_string(data).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    sqlx::query("UPDATE profiles SET data = ? WHERE id = ?")
        .bind(&data_json)
        .bind(profile_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete a profile by id.
pub async fn delete_profile(pool: &SqlitePool, profile_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM profiles WHERE id = ?")
        .bind(profile_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Make `profile_id` the user's single active profile.
///
/// One transaction: deactivate every profile the user owns, then activate
/// the target. A concurrent `get_active_profile` never observes zero or
/// two active profiles.
pub async fn set_active_profile(
    pool: &SqlitePool,
    user_id: &str,
    profile_id: &str,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE profiles SET is_active = 0 WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("UPDATE profiles SET is_active = 1 WHERE id = ? AND user_id = ?")
        .bind(profile_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        // Target missing or owned by someone else; leave everything untouched
        tx.rollback().await?;
        return Ok(false);
    }

    tx.commit().await?;
    Ok(true)
}

#[cfg(test)]
#[path = "tests/profile_repo_tests.rs"]
mod tests;
