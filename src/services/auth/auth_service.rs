//! Account registration, login and bearer-token verification.
//!
//! Passwords are hashed with argon2id; login issues an opaque uuid token
//! persisted in the `sessions` table, sent back by clients as
//! `Authorization: Bearer <token>`.

use sqlx::SqlitePool;

use crate::database::models::UserRow;
use crate::database::user_repo;
use crate::types::errors::{AppError, AppResult};

fn hash_password(password: &str) -> AppResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
        Argon2,
    };

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

fn verify_password(hash: &str, password: &str) -> bool {
    use argon2::{
        password_hash::{PasswordHash, PasswordVerifier},
        Argon2,
    };

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Create an account. Email must be unique, password non-empty.
pub async fn register(pool: &SqlitePool, email: &str, password: &str) -> AppResult<UserRow> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::InvalidInput(
            "Please provide an email and password".to_string(),
        ));
    }

    if user_repo::get_user_by_email(pool, email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(password)?;
    let user = user_repo::insert_user(pool, email, &password_hash).await?;
    log::info!("registered user {}", user.id);
    Ok(user)
}

/// Verify credentials and issue a new bearer token.
pub async fn login(pool: &SqlitePool, email: &str, password: &str) -> AppResult<String> {
    let user = user_repo::get_user_by_email(pool, email.trim())
        .await?
        .ok_or_else(|| AppError::NotAuthorized("Invalid credentials".to_string()))?;

    if !verify_password(&user.password_hash, password) {
        return Err(AppError::NotAuthorized("Invalid credentials".to_string()));
    }

    let token = uuid::Uuid::new_v4().to_string();
    user_repo::insert_session(pool, &user.id, &token).await?;
    Ok(token)
}

/// Resolve a bearer token to the owning user id.
pub async fn authenticate(pool: &SqlitePool, token: &str) -> AppResult<String> {
    let session = user_repo::get_session(pool, token)
        .await?
        .ok_or_else(|| AppError::NotAuthorized("Invalid or expired token".to_string()))?;
    Ok(session.user_id)
}

/// Invalidate a bearer token.
pub async fn logout(pool: &SqlitePool, token: &str) -> AppResult<()> {
    user_repo::delete_session(pool, token).await?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/auth_service_tests.rs"]
mod tests;
