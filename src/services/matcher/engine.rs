//! Two-tier label resolution against a user's active profile.
//!
//! Tier 1: explicit user-taught mappings, compared by mapping-lookup
//! normalization. Tier 2: keyword containment over profile data keys in
//! stored order. Per-label resolution is a pure function over the loaded
//! snapshots; the async wrappers only fetch mappings and the active
//! profile, once per request.

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::database::models::{FieldMapping, ProfileData};
use crate::database::{mapping_repo, profile_repo};
use crate::types::errors::AppResult;

use super::normalizer::{normalize_fallback_label, normalize_key, normalize_label};

/// Resolve a batch of raw labels against loaded snapshots.
///
/// Pure: no store access, no mutation. Duplicate labels resolve
/// independently to the same value. Unresolved labels are absent from
/// the result, never present as empty strings.
pub fn resolve_labels(
    labels: &[String],
    mappings: &[FieldMapping],
    data: &ProfileData,
) -> HashMap<String, String> {
    // normalized form_label -> mapped_key; if two raw labels normalize to
    // the same text the later mapping wins
    let mut lookup: HashMap<String, &str> = HashMap::new();
    for mapping in mappings {
        lookup.insert(normalize_label(&mapping.form_label), mapping.mapped_key.as_str());
    }

    let mut matches = HashMap::new();
    for label in labels {
        if let Some(value) = resolve_one(label, &lookup, data) {
            matches.insert(label.clone(), value);
        }
    }
    matches
}

/// Resolve a single label: mapping tier first, keyword fallback second.
fn resolve_one(
    label: &str,
    lookup: &HashMap<String, &str>,
    data: &ProfileData,
) -> Option<String> {
    // Tier 1: explicit mapping. Short-circuits the fallback on a hit.
    if let Some(mapped_key) = lookup.get(&normalize_label(label)) {
        if let Some(value) = data.get(*mapped_key).and_then(|v| v.as_str()) {
            return Some(value.to_string());
        }
        // Stale mapping: mapped_key no longer in profile data. Fall
        // through to the keyword tier instead of failing.
        log::debug!("mapping for label {label:?} points at missing key {mapped_key:?}, trying keyword fallback");
    }

    // Tier 2: first profile key (in stored order) whose normalized form
    // is contained in the label wins.
    let fallback_label = normalize_fallback_label(label);
    for (key, value) in data {
        if fallback_label.contains(&normalize_key(key)) {
            return value.as_str().map(|s| s.to_string());
        }
    }

    None
}

/// Resolve a batch of labels for a user.
///
/// Mappings and the active profile are each fetched a single time and
/// reused for every label. No active profile, or an active profile with
/// empty data, yields an empty result.
pub async fn resolve(
    pool: &SqlitePool,
    user_id: &str,
    labels: &[String],
) -> AppResult<HashMap<String, String>> {
    let Some(profile) = profile_repo::get_active_profile(pool, user_id).await? else {
        return Ok(HashMap::new());
    };
    if profile.data.is_empty() {
        return Ok(HashMap::new());
    }

    let mappings = mapping_repo::get_mappings_for_user(pool, user_id).await?;
    Ok(resolve_labels(labels, &mappings, &profile.data))
}

/// Resolve a single label; used by the learning protocol after a new
/// mapping lands, so only the just-mapped label is re-run.
pub async fn resolve_single(
    pool: &SqlitePool,
    user_id: &str,
    label: &str,
) -> AppResult<Option<String>> {
    let labels = [label.to_string()];
    let mut matches = resolve(pool, user_id, &labels).await?;
    Ok(matches.remove(label))
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
