use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Profile field data: a JSON object of field key -> scalar string value.
/// Key order is preserved (serde_json `preserve_order`) because the
/// fallback matcher scans keys in stored order.
pub type ProfileData = serde_json::Map<String, serde_json::Value>;

/// Account row stored in the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

/// Bearer-token session row stored in the `sessions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRow {
    pub token: String,
    pub user_id: String,
    pub created_at: String,
}

/// Raw profile row as stored; `data` is the JSON text column.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub data: String,
    pub is_active: bool,
    pub created_at: String,
}

/// Profile with its data column parsed into an ordered map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub data: ProfileData,
    pub is_active: bool,
    pub created_at: String,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = serde_json::Error;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let data: ProfileData = serde_json::from_str(&row.data)?;
        Ok(Profile {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            data,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

/// User-taught association from a raw form label to a profile data key.
/// Unique per (user_id, form_label); `form_label` is stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FieldMapping {
    pub id: String,
    pub user_id: String,
    pub form_label: String,
    pub mapped_key: String,
    pub created_at: String,
}

/// Write behavior for `POST /api/mappings`.
///
/// `Upsert` replaces an existing mapping for the same raw label (the
/// learning protocol's re-teach flow); `CreateOnly` rejects duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingWritePolicy {
    #[default]
    Upsert,
    CreateOnly,
}

impl FromStr for MappingWritePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upsert" => Ok(MappingWritePolicy::Upsert),
            "create-only" | "create_only" => Ok(MappingWritePolicy::CreateOnly),
            _ => Err(format!("Unknown mapping write policy: {s}")),
        }
    }
}

#[cfg(test)]
#[path = "tests/models_tests.rs"]
mod tests;
