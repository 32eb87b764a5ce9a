//! Fixtures shared by the repository integration tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use kennel_core::types::DbId;
use kennel_db::models::dog::{CreateDog, Dog};
use kennel_db::models::subscription::{CreateSubscription, Subscription};
use kennel_db::models::user::{Account, CreateAccount};
use kennel_db::repositories::{DogRepo, SubscriptionRepo, UserRepo};
use sqlx::PgPool;

pub async fn customer(pool: &PgPool, email: &str, approved: bool) -> Account {
    UserRepo::create_account(
        pool,
        &CreateAccount {
            email: email.to_string(),
            password_hash: "$argon2id$not-a-real-hash".to_string(),
            full_name: format!("Owner {email}"),
            phone: None,
            role: "user".to_string(),
            is_approved: approved,
            approved_by: None,
        },
    )
    .await
    .unwrap()
}

pub async fn approved_dog(pool: &PgPool, owner_id: DbId, name: &str) -> Dog {
    let dog = DogRepo::create(
        pool,
        owner_id,
        &CreateDog {
            name: name.to_string(),
            breed: Some("Beagle".to_string()),
            birth_date: None,
            weight_lbs: Some(24.5),
            sex: Some("female".to_string()),
            is_spayed_neutered: Some(true),
            vet_name: None,
            vet_phone: None,
            notes: None,
            photo_url: None,
        },
    )
    .await
    .unwrap();
    DogRepo::approve(pool, dog.id).await.unwrap().unwrap()
}

/// Activate a subscription on the first seeded tier with `days` days.
pub async fn subscription(pool: &PgPool, user_id: DbId, days: i32) -> Subscription {
    subscription_with_provider_id(pool, user_id, days, None).await
}

pub async fn subscription_with_provider_id(
    pool: &PgPool,
    user_id: DbId,
    days: i32,
    provider_subscription_id: Option<&str>,
) -> Subscription {
    let tier_id: DbId = sqlx::query_scalar("SELECT id FROM subscription_tiers ORDER BY sort_order LIMIT 1")
        .fetch_one(pool)
        .await
        .unwrap();
    let now = Utc::now();
    let mut conn = pool.acquire().await.unwrap();
    SubscriptionRepo::activate(
        &mut conn,
        &CreateSubscription {
            user_id,
            tier_id,
            days_included: days,
            price_cents: 16000,
            extra_day_price_cents: 4500,
            provider_customer_id: Some("cus_test".to_string()),
            provider_subscription_id: provider_subscription_id.map(str::to_string),
            checkout_session_id: None,
            current_period_start: now,
            current_period_end: now + Duration::days(30),
        },
    )
    .await
    .unwrap()
}
