use super::*;
use crate::database::models::ProfileData;
use crate::test_utils::seed_user;
use sqlx::SqlitePool;

async fn setup_pool() -> SqlitePool {
    let ctx = crate::test_utils::init_test_db().await;
    ctx.pool
}

fn data_from(pairs: &[(&str, &str)]) -> ProfileData {
    let mut data = ProfileData::new();
    for (k, v) in pairs {
        data.insert(k.to_string(), serde_json::Value::String(v.to_string()));
    }
    data
}

#[tokio::test]
async fn test_insert_and_list_profiles() {
    let pool = setup_pool().await;
    let user_id = seed_user(&pool, "ada@example.com").await;

    let data = data_from(&[("email", "ada@example.com")]);
    let profile = insert_profile(&pool, &user_id, "Main", &data).await.unwrap();
    assert!(!profile.is_active);

    let profiles = get_profiles_for_user(&pool, &user_id).await.unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].name, "Main");
    assert_eq!(
        profiles[0].data.get("email").and_then(|v| v.as_str()),
        Some("ada@example.com")
    );
}

#[tokio::test]
async fn test_data_key_order_survives_storage() {
    let pool = setup_pool().await;
    let user_id = seed_user(&pool, "ada@example.com").await;

    let data = data_from(&[("address", "X"), ("address_line", "Y"), ("email", "Z")]);
    let profile = insert_profile(&pool, &user_id, "Main", &data).await.unwrap();

    let loaded = get_profile_by_id(&pool, &profile.id).await.unwrap().unwrap();
    let keys: Vec<&str> = loaded.data.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["address", "address_line", "email"]);
}

#[tokio::test]
async fn test_activation_is_exclusive() {
    let pool = setup_pool().await;
    let user_id = seed_user(&pool, "ada@example.com").await;

    let data = ProfileData::new();
    let a = insert_profile(&pool, &user_id, "A", &data).await.unwrap();
    let b = insert_profile(&pool, &user_id, "B", &data).await.unwrap();

    assert!(set_active_profile(&pool, &user_id, &a.id).await.unwrap());
    assert!(set_active_profile(&pool, &user_id, &b.id).await.unwrap());

    // Exactly one active profile, and it is B
    let active = get_active_profile(&pool, &user_id).await.unwrap().unwrap();
    assert_eq!(active.id, b.id);

    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM profiles WHERE user_id = ? AND is_active = 1")
            .bind(&user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count.0, 1);
}

#[tokio::test]
async fn test_activation_of_foreign_profile_fails_without_side_effects() {
    let pool = setup_pool().await;
    let ada = seed_user(&pool, "ada@example.com").await;
    let bob = seed_user(&pool, "bob@example.com").await;

    let data = ProfileData::new();
    let ada_profile = insert_profile(&pool, &ada, "A", &data).await.unwrap();
    set_active_profile(&pool, &ada, &ada_profile.id).await.unwrap();

    // Bob cannot activate Ada's profile, and Ada's stays active
    assert!(!set_active_profile(&pool, &bob, &ada_profile.id).await.unwrap());
    let active = get_active_profile(&pool, &ada).await.unwrap().unwrap();
    assert_eq!(active.id, ada_profile.id);
}

#[tokio::test]
async fn test_update_and_delete_profile() {
    let pool = setup_pool().await;
    let user_id = seed_user(&pool, "ada@example.com").await;

    let profile = insert_profile(&pool, &user_id, "Main", &ProfileData::new())
        .await
        .unwrap();

    let new_data = data_from(&[("email", "new@example.com")]);
    update_profile(&pool, &profile.id, "Renamed", &new_data).await.unwrap();

    let loaded = get_profile_by_id(&pool, &profile.id).await.unwrap().unwrap();
    assert_eq!(loaded.name, "Renamed");
    assert_eq!(
        loaded.data.get("email").and_then(|v| v.as_str()),
        Some("new@example.com")
    );

    delete_profile(&pool, &profile.id).await.unwrap();
    assert!(get_profile_by_id(&pool, &profile.id).await.unwrap().is_none());
}
