use sqlx::SqlitePool;

use super::models::{SessionRow, UserRow};

/// Insert a new user. Fails on duplicate email (unique index).
pub async fn insert_user(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
) -> Result<UserRow, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = chrono::Utc::now().to_rfc3339();
    sqlx::query("INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(email)
        .bind(password_hash)
        .bind(&created_at)
        .execute(pool)
        .await?;

    Ok(UserRow {
        id,
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        created_at,
    })
}

/// Look up a user by email.
pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Persist a bearer-token session for a user.
pub async fn insert_session(
    pool: &SqlitePool,
    user_id: &str,
    token: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
        .bind(token)
        .bind(user_id)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(pool)
        .await?;
    Ok(())
}

/// Resolve a bearer token to its session row, if any.
pub async fn get_session(pool: &SqlitePool, token: &str) -> Result<Option<SessionRow>, sqlx::Error> {
    sqlx::query_as::<_, SessionRow>(
        "SELECT token, user_id, created_at FROM sessions WHERE token = ?",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

/// Delete a session (logout).
pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/user_repo_tests.rs"]
mod tests;
