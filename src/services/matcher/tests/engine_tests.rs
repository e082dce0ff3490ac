use super::*;
use crate::database::mapping_repo::upsert_mapping;
use crate::database::models::{FieldMapping, ProfileData};
use crate::database::profile_repo::{insert_profile, set_active_profile};
use crate::test_utils::seed_user;

fn data_from(pairs: &[(&str, &str)]) -> ProfileData {
    let mut data = ProfileData::new();
    for (k, v) in pairs {
        data.insert(k.to_string(), serde_json::Value::String(v.to_string()));
    }
    data
}

fn mapping(form_label: &str, mapped_key: &str) -> FieldMapping {
    FieldMapping {
        id: "m1".into(),
        user_id: "u1".into(),
        form_label: form_label.into(),
        mapped_key: mapped_key.into(),
        created_at: "2026-01-01T00:00:00Z".into(),
    }
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_mapping_tier_wins_over_fallback() {
    // "Phone" would never match by keyword; the mapping resolves it.
    // Even with a fallback candidate present the mapping tier must win.
    let data = data_from(&[("phone", "WRONG"), ("mobile_number", "555-1234")]);
    let mappings = vec![mapping("Phone", "mobile_number")];

    let result = resolve_labels(&labels(&["Phone"]), &mappings, &data);
    assert_eq!(result.get("Phone").map(|s| s.as_str()), Some("555-1234"));
}

#[test]
fn test_mapping_matches_normalized_label() {
    let data = data_from(&[("email", "ada@example.com")]);
    let mappings = vec![mapping("Email*", "email")];

    let result = resolve_labels(&labels(&["  email : "]), &mappings, &data);
    assert_eq!(
        result.get("  email : ").map(|s| s.as_str()),
        Some("ada@example.com")
    );
}

#[test]
fn test_stale_mapping_falls_through_to_keyword_tier() {
    // Mapping points at a key no longer in the profile: the label must
    // still be attempted against the keyword tier, not silently dropped.
    let data = data_from(&[("mobile number", "555-1234")]);
    let mappings = vec![mapping("Enter your mobile number", "deleted_key")];

    let result = resolve_labels(&labels(&["Enter your mobile number"]), &mappings, &data);
    assert_eq!(
        result.get("Enter your mobile number").map(|s| s.as_str()),
        Some("555-1234")
    );
}

#[test]
fn test_fallback_containment_with_underscored_key() {
    let data = data_from(&[("mobile_number", "555-1234")]);

    let result = resolve_labels(&labels(&["Enter your mobile number"]), &[], &data);
    assert_eq!(
        result.get("Enter your mobile number").map(|s| s.as_str()),
        Some("555-1234")
    );
}

#[test]
fn test_fallback_first_key_in_stored_order_wins() {
    let data = data_from(&[("address", "X"), ("address_line", "Y")]);

    let result = resolve_labels(&labels(&["address"]), &[], &data);
    assert_eq!(result.get("address").map(|s| s.as_str()), Some("X"));
}

#[test]
fn test_unresolved_labels_are_absent() {
    let data = data_from(&[("email", "ada@example.com")]);

    let result = resolve_labels(&labels(&["Favourite colour"]), &[], &data);
    assert!(result.is_empty());
}

#[test]
fn test_duplicate_labels_resolve_identically() {
    let data = data_from(&[("email", "ada@example.com")]);

    let result = resolve_labels(&labels(&["Your email", "Your email"]), &[], &data);
    assert_eq!(result.len(), 1);
    assert_eq!(
        result.get("Your email").map(|s| s.as_str()),
        Some("ada@example.com")
    );
}

#[tokio::test]
async fn test_resolve_without_active_profile_is_empty() {
    let ctx = crate::test_utils::init_test_db().await;
    let user_id = seed_user(&ctx.pool, "ada@example.com").await;

    // A profile exists but none is active
    insert_profile(&ctx.pool, &user_id, "Main", &data_from(&[("email", "x")]))
        .await
        .unwrap();

    let result = resolve(&ctx.pool, &user_id, &labels(&["email"])).await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_resolve_with_empty_profile_data_is_empty() {
    let ctx = crate::test_utils::init_test_db().await;
    let user_id = seed_user(&ctx.pool, "ada@example.com").await;

    let profile = insert_profile(&ctx.pool, &user_id, "Main", &ProfileData::new())
        .await
        .unwrap();
    set_active_profile(&ctx.pool, &user_id, &profile.id).await.unwrap();

    let result = resolve(&ctx.pool, &user_id, &labels(&["email"])).await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_resolve_end_to_end_via_stores() {
    let ctx = crate::test_utils::init_test_db().await;
    let user_id = seed_user(&ctx.pool, "ada@example.com").await;

    let data = data_from(&[("mobile_number", "555-1234"), ("email", "ada@example.com")]);
    let profile = insert_profile(&ctx.pool, &user_id, "Main", &data).await.unwrap();
    set_active_profile(&ctx.pool, &user_id, &profile.id).await.unwrap();
    upsert_mapping(&ctx.pool, &user_id, "Phone", "mobile_number")
        .await
        .unwrap();

    let result = resolve(
        &ctx.pool,
        &user_id,
        &labels(&["Phone", "Enter your email", "Unknown field"]),
    )
    .await
    .unwrap();

    assert_eq!(result.get("Phone").map(|s| s.as_str()), Some("555-1234"));
    assert_eq!(
        result.get("Enter your email").map(|s| s.as_str()),
        Some("ada@example.com")
    );
    assert!(!result.contains_key("Unknown field"));
}

#[tokio::test]
async fn test_resolve_single_returns_just_that_label() {
    let ctx = crate::test_utils::init_test_db().await;
    let user_id = seed_user(&ctx.pool, "ada@example.com").await;

    let data = data_from(&[("email", "ada@example.com")]);
    let profile = insert_profile(&ctx.pool, &user_id, "Main", &data).await.unwrap();
    set_active_profile(&ctx.pool, &user_id, &profile.id).await.unwrap();

    let value = resolve_single(&ctx.pool, &user_id, "Your email").await.unwrap();
    assert_eq!(value.as_deref(), Some("ada@example.com"));

    let missing = resolve_single(&ctx.pool, &user_id, "Nothing here").await.unwrap();
    assert!(missing.is_none());
}
