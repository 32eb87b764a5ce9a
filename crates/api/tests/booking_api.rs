//! Daycare booking: balance checks, debits, and cancellation refunds.

mod common;

use axum::http::StatusCode;
use common::{days_from_today, expect_status, get_auth, post_auth, post_json_auth, token_for};
use kennel_db::repositories::SubscriptionRepo;
use serde_json::json;
use sqlx::PgPool;

async fn days_remaining(pool: &PgPool, user_id: i64) -> i32 {
    SubscriptionRepo::find_active_for_user(pool, user_id)
        .await
        .unwrap()
        .unwrap()
        .days_remaining
}

async fn booking_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn half_day_without_time_is_rejected_before_database() {
    let app = common::build_test_app(common::lazy_pool());
    let token = token_for(1, "user");
    let body = json!({
        "dog_ids": [1],
        "dates": [days_from_today(3)],
        "session_type": "half_day",
    });

    let json = expect_status(
        post_json_auth(app, "/api/v1/me/bookings", body, &token).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert!(json["error"].as_str().unwrap().contains("session time"));
}

#[tokio::test]
async fn past_date_is_rejected_before_database() {
    let app = common::build_test_app(common::lazy_pool());
    let token = token_for(1, "user");
    let body = json!({
        "dog_ids": [1],
        "dates": [days_from_today(-1)],
        "session_type": "full_day",
    });
    let response = post_json_auth(app, "/api/v1/me/bookings", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn booking_debits_one_day_per_date(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let rex = common::dog(&pool, owner.user.id, "Rex", true).await;
    let bella = common::dog(&pool, owner.user.id, "Bella", true).await;
    common::subscription(&pool, owner.user.id, 4, None).await;
    let app = common::build_test_app(pool.clone());
    let token = token_for(owner.user.id, "user");

    let body = json!({
        "dog_ids": [rex.id, bella.id],
        "dates": [days_from_today(2), days_from_today(3)],
        "session_type": "half_day",
        "session_time": "morning",
        "notes": "Bella needs her harness",
    });
    let json = expect_status(
        post_json_auth(app.clone(), "/api/v1/me/bookings", body, &token).await,
        StatusCode::CREATED,
    )
    .await;

    assert_eq!(json["days_used"], 2);
    assert_eq!(json["days_remaining"], 2);
    assert_eq!(json["bookings"].as_array().unwrap().len(), 2);
    assert_eq!(json["bookings"][0]["dog_ids"], json!([rex.id, bella.id]));
    assert_eq!(days_remaining(&pool, owner.user.id).await, 2);

    let listed = expect_status(
        get_auth(app, "/api/v1/me/bookings", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn insufficient_balance_writes_nothing(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let rex = common::dog(&pool, owner.user.id, "Rex", true).await;
    common::subscription(&pool, owner.user.id, 1, None).await;
    let app = common::build_test_app(pool.clone());
    let token = token_for(owner.user.id, "user");

    let body = json!({
        "dog_ids": [rex.id],
        "dates": [days_from_today(2), days_from_today(3)],
        "session_type": "full_day",
    });
    let json = expect_status(
        post_json_auth(app, "/api/v1/me/bookings", body, &token).await,
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert_eq!(
        json["error"],
        "Not enough days remaining: 2 requested, 1 available"
    );
    assert_eq!(booking_count(&pool).await, 0);
    assert_eq!(days_remaining(&pool, owner.user.id).await, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unapproved_account_cannot_book(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", false).await;
    let rex = common::dog(&pool, owner.user.id, "Rex", true).await;
    common::subscription(&pool, owner.user.id, 4, None).await;
    let app = common::build_test_app(pool.clone());
    let token = token_for(owner.user.id, "user");

    let body = json!({
        "dog_ids": [rex.id],
        "dates": [days_from_today(2)],
        "session_type": "full_day",
    });
    let response = post_json_auth(app, "/api/v1/me/bookings", body, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(booking_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unapproved_dog_cannot_be_booked(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let pup = common::dog(&pool, owner.user.id, "Pup", false).await;
    common::subscription(&pool, owner.user.id, 4, None).await;
    let app = common::build_test_app(pool);
    let token = token_for(owner.user.id, "user");

    let body = json!({
        "dog_ids": [pup.id],
        "dates": [days_from_today(2)],
        "session_type": "full_day",
    });
    let json = expect_status(
        post_json_auth(app, "/api/v1/me/bookings", body, &token).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert!(json["error"].as_str().unwrap().contains("Pup"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn someone_elses_dog_cannot_be_booked(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let other = common::customer(&pool, "other@example.com", true).await;
    let theirs = common::dog(&pool, other.user.id, "Max", true).await;
    common::subscription(&pool, owner.user.id, 4, None).await;
    let app = common::build_test_app(pool);
    let token = token_for(owner.user.id, "user");

    let body = json!({
        "dog_ids": [theirs.id],
        "dates": [days_from_today(2)],
        "session_type": "full_day",
    });
    let response = post_json_auth(app, "/api/v1/me/bookings", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn booking_without_subscription_is_rejected(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let rex = common::dog(&pool, owner.user.id, "Rex", true).await;
    let app = common::build_test_app(pool);
    let token = token_for(owner.user.id, "user");

    let body = json!({
        "dog_ids": [rex.id],
        "dates": [days_from_today(2)],
        "session_type": "full_day",
    });
    let json = expect_status(
        post_json_auth(app, "/api/v1/me/bookings", body, &token).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert!(json["error"].as_str().unwrap().contains("subscription"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rebooking_the_same_date_conflicts(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let rex = common::dog(&pool, owner.user.id, "Rex", true).await;
    common::subscription(&pool, owner.user.id, 4, None).await;
    let app = common::build_test_app(pool.clone());
    let token = token_for(owner.user.id, "user");
    let body = json!({
        "dog_ids": [rex.id],
        "dates": [days_from_today(5)],
        "session_type": "full_day",
    });

    let first = post_json_auth(app.clone(), "/api/v1/me/bookings", body.clone(), &token).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = post_json_auth(app, "/api/v1/me/bookings", body, &token).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    // The failed attempt rolled back its debit.
    assert_eq!(days_remaining(&pool, owner.user.id).await, 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancelling_a_future_booking_refunds_the_day(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let rex = common::dog(&pool, owner.user.id, "Rex", true).await;
    common::subscription(&pool, owner.user.id, 4, None).await;
    let app = common::build_test_app(pool.clone());
    let token = token_for(owner.user.id, "user");

    let created = expect_status(
        post_json_auth(
            app.clone(),
            "/api/v1/me/bookings",
            json!({
                "dog_ids": [rex.id],
                "dates": [days_from_today(4)],
                "session_type": "full_day",
            }),
            &token,
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let booking_id = created["bookings"][0]["id"].as_i64().unwrap();
    assert_eq!(days_remaining(&pool, owner.user.id).await, 3);

    let cancelled = expect_status(
        post_auth(
            app.clone(),
            &format!("/api/v1/me/bookings/{booking_id}/cancel"),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(cancelled["day_refunded"], true);
    assert_eq!(cancelled["booking"]["status"], "cancelled");
    assert_eq!(days_remaining(&pool, owner.user.id).await, 4);

    let again = post_auth(
        app,
        &format!("/api/v1/me/bookings/{booking_id}/cancel"),
        &token,
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    assert_eq!(days_remaining(&pool, owner.user.id).await, 4);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn same_day_cancellation_keeps_the_day(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let rex = common::dog(&pool, owner.user.id, "Rex", true).await;
    common::subscription(&pool, owner.user.id, 4, None).await;
    let app = common::build_test_app(pool.clone());
    let token = token_for(owner.user.id, "user");

    let created = expect_status(
        post_json_auth(
            app.clone(),
            "/api/v1/me/bookings",
            json!({
                "dog_ids": [rex.id],
                "dates": [common::today()],
                "session_type": "full_day",
            }),
            &token,
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let booking_id = created["bookings"][0]["id"].as_i64().unwrap();

    let cancelled = expect_status(
        post_auth(app, &format!("/api/v1/me/bookings/{booking_id}/cancel"), &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(cancelled["day_refunded"], false);
    assert_eq!(days_remaining(&pool, owner.user.id).await, 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cannot_cancel_another_users_booking(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let other = common::customer(&pool, "other@example.com", true).await;
    let rex = common::dog(&pool, owner.user.id, "Rex", true).await;
    common::subscription(&pool, owner.user.id, 4, None).await;
    let app = common::build_test_app(pool);

    let created = expect_status(
        post_json_auth(
            app.clone(),
            "/api/v1/me/bookings",
            json!({
                "dog_ids": [rex.id],
                "dates": [days_from_today(4)],
                "session_type": "full_day",
            }),
            &token_for(owner.user.id, "user"),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let booking_id = created["bookings"][0]["id"].as_i64().unwrap();

    let response = post_auth(
        app,
        &format!("/api/v1/me/bookings/{booking_id}/cancel"),
        &token_for(other.user.id, "user"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
