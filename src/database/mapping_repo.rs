use sqlx::SqlitePool;

use super::models::FieldMapping;

/// Get all of a user's label mappings.
pub async fn get_mappings_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<FieldMapping>, sqlx::Error> {
    sqlx::query_as::<_, FieldMapping>(
        "SELECT id, user_id, form_label, mapped_key, created_at FROM field_mappings WHERE user_id = ? ORDER BY created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Create or replace the mapping for (user_id, form_label).
///
/// A second write for the same raw label replaces the prior mapped_key;
/// the unique index guarantees a single row per label.
pub async fn upsert_mapping(
    pool: &SqlitePool,
    user_id: &str,
    form_label: &str,
    mapped_key: &str,
) -> Result<FieldMapping, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO field_mappings (id, user_id, form_label, mapped_key, created_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT (user_id, form_label) DO UPDATE SET mapped_key = excluded.mapped_key",
    )
    .bind(&id)
    .bind(user_id)
    .bind(form_label)
    .bind(mapped_key)
    .bind(&created_at)
    .execute(pool)
    .await?;

    // The insert id is discarded on conflict; read back the surviving row
    let row = sqlx::query_as::<_, FieldMapping>(
        "SELECT id, user_id, form_label, mapped_key, created_at FROM field_mappings WHERE user_id = ? AND form_label = ?",
    )
    .bind(user_id)
    .bind(form_label)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Insert a mapping, failing if one already exists for the raw label.
/// Returns `None` on duplicate.
pub async fn insert_mapping(
    pool: &SqlitePool,
    user_id: &str,
    form_label: &str,
    mapped_key: &str,
) -> Result<Option<FieldMapping>, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query(
        "INSERT OR IGNORE INTO field_mappings (id, user_id, form_label, mapped_key, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(form_label)
    .bind(mapped_key)
    .bind(&created_at)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(FieldMapping {
        id,
        user_id: user_id.to_string(),
        form_label: form_label.to_string(),
        mapped_key: mapped_key.to_string(),
        created_at,
    }))
}

/// Count mapping rows for (user_id, form_label). Only used by tests and
/// the idempotence checks; the unique index keeps this at 0 or 1.
pub async fn count_mappings_for_label(
    pool: &SqlitePool,
    user_id: &str,
    form_label: &str,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM field_mappings WHERE user_id = ? AND form_label = ?",
    )
    .bind(user_id)
    .bind(form_label)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

#[cfg(test)]
#[path = "tests/mapping_repo_tests.rs"]
mod tests;
