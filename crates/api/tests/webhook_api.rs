//! Signed provider webhooks: activation, top-ups, renewals and replays.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    checkout_session, expect_status, invoice_object, post_webhook, sign_payload, stripe_event,
    subscription_object,
};
use kennel_billing::SIGNATURE_HEADER;
use kennel_db::repositories::{SubscriptionRepo, WebhookEventRepo};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

fn subscription_checkout(event_id: &str, session_id: &str, user_id: i64, tier_id: i64) -> Value {
    let mut session = checkout_session(
        session_id,
        "subscription",
        "paid",
        json!({
            "type": "subscription",
            "tierId": tier_id.to_string(),
            "userId": user_id.to_string(),
            "days": "4",
        }),
    );
    session["subscription"] = json!("sub_abc");
    session["amount_total"] = json!(16000);
    stripe_event(event_id, "checkout.session.completed", session)
}

fn extra_days_session(
    session_id: &str,
    payment_status: &str,
    user_id: i64,
    subscription_id: i64,
) -> Value {
    let mut session = checkout_session(
        session_id,
        "payment",
        payment_status,
        json!({
            "type": "extra_days",
            "userId": user_id.to_string(),
            "subscriptionId": subscription_id.to_string(),
            "numDays": "3",
        }),
    );
    session["amount_total"] = json!(13500);
    session
}

fn extra_days_checkout(event_id: &str, session_id: &str, user_id: i64, subscription_id: i64) -> Value {
    stripe_event(
        event_id,
        "checkout.session.completed",
        extra_days_session(session_id, "paid", user_id, subscription_id),
    )
}

async fn balance(pool: &PgPool, subscription_id: i64) -> i32 {
    SubscriptionRepo::find_by_id(pool, subscription_id)
        .await
        .unwrap()
        .unwrap()
        .days_remaining
}

async fn ledger_has(pool: &PgPool, event_id: &str) -> bool {
    WebhookEventRepo::find_by_event_id(pool, event_id)
        .await
        .unwrap()
        .is_some()
}

#[tokio::test]
async fn bad_signature_is_rejected_before_database() {
    let app = common::build_test_app(common::lazy_pool());
    let payload = stripe_event(
        "evt_1",
        "invoice.paid",
        invoice_object("in_1", "sub_1", "subscription_cycle", 1_774_600_000),
    )
    .to_string();
    let header = sign_payload(payload.as_bytes(), "whsec_wrong", chrono::Utc::now().timestamp());

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/billing/webhook")
        .header(SIGNATURE_HEADER, header)
        .body(Body::from(payload))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "INVALID_WEBHOOK");
}

#[tokio::test]
async fn stale_signature_is_rejected() {
    let app = common::build_test_app(common::lazy_pool());
    let payload = stripe_event(
        "evt_old",
        "invoice.paid",
        invoice_object("in_old", "sub_1", "subscription_cycle", 1_774_600_000),
    )
    .to_string();
    let an_hour_ago = chrono::Utc::now().timestamp() - 3600;
    let header = sign_payload(payload.as_bytes(), common::WEBHOOK_SECRET, an_hour_ago);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/billing/webhook")
        .header(SIGNATURE_HEADER, header)
        .body(Body::from(payload))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_signature_is_rejected() {
    let app = common::build_test_app(common::lazy_pool());
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/billing/webhook")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn subscription_checkout_activates_with_full_balance(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let tier_id = common::first_tier_id(&pool).await;
    let app = common::build_test_app(pool.clone());

    let event = subscription_checkout("evt_1", "cs_1", owner.user.id, tier_id);
    let ack = expect_status(post_webhook(app, &event).await, StatusCode::OK).await;
    assert_eq!(ack, json!({ "received": true }));

    let sub = SubscriptionRepo::find_active_for_user(&pool, owner.user.id)
        .await
        .unwrap()
        .expect("subscription activated");
    assert_eq!(sub.days_included, 4);
    assert_eq!(sub.days_remaining, sub.days_included);
    assert_eq!(sub.tier_id, tier_id);
    assert_eq!(sub.price_cents, 16000);
    assert_eq!(sub.extra_day_price_cents, common::EXTRA_DAY_PRICE_CENTS);
    assert_eq!(sub.provider_subscription_id.as_deref(), Some("sub_abc"));
    assert_eq!(sub.checkout_session_id.as_deref(), Some("cs_1"));
    assert!(sub.current_period_end > sub.current_period_start);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn checkout_for_unknown_tier_is_acknowledged_not_retried(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let app = common::build_test_app(pool.clone());

    let event = subscription_checkout("evt_tier", "cs_tier", owner.user.id, 999);
    let ack = expect_status(post_webhook(app.clone(), &event).await, StatusCode::OK).await;
    assert_eq!(ack["duplicate"], Value::Null);

    assert!(SubscriptionRepo::find_active_for_user(&pool, owner.user.id)
        .await
        .unwrap()
        .is_none());
    assert!(ledger_has(&pool, "evt_tier").await);

    let redelivery = expect_status(post_webhook(app, &event).await, StatusCode::OK).await;
    assert_eq!(redelivery["duplicate"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn checkout_for_unknown_customer_is_acknowledged_not_retried(pool: PgPool) {
    let tier_id = common::first_tier_id(&pool).await;
    let app = common::build_test_app(pool.clone());

    let event = subscription_checkout("evt_ghost", "cs_ghost", 424_242, tier_id);
    expect_status(post_webhook(app, &event).await, StatusCode::OK).await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
    assert!(ledger_has(&pool, "evt_ghost").await);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unpaid_checkout_waits_for_async_payment(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let sub = common::subscription(&pool, owner.user.id, 4, None).await;
    let app = common::build_test_app(pool.clone());

    let completed = stripe_event(
        "evt_pending",
        "checkout.session.completed",
        extra_days_session("cs_debit", "unpaid", owner.user.id, sub.id),
    );
    expect_status(post_webhook(app.clone(), &completed).await, StatusCode::OK).await;
    assert_eq!(balance(&pool, sub.id).await, 4);
    assert!(ledger_has(&pool, "evt_pending").await);

    let settled = stripe_event(
        "evt_settled",
        "checkout.session.async_payment_succeeded",
        extra_days_session("cs_debit", "paid", owner.user.id, sub.id),
    );
    let ack = expect_status(post_webhook(app.clone(), &settled).await, StatusCode::OK).await;
    assert_eq!(ack["duplicate"], Value::Null);
    assert_eq!(balance(&pool, sub.id).await, 7);

    let replay = expect_status(post_webhook(app, &settled).await, StatusCode::OK).await;
    assert_eq!(replay["duplicate"], true);
    assert_eq!(balance(&pool, sub.id).await, 7);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn replayed_event_is_acknowledged_once(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let sub = common::subscription(&pool, owner.user.id, 4, None).await;
    let app = common::build_test_app(pool.clone());

    let event = extra_days_checkout("evt_2", "cs_2", owner.user.id, sub.id);
    let first = expect_status(post_webhook(app.clone(), &event).await, StatusCode::OK).await;
    assert_eq!(first["duplicate"], Value::Null);

    let second = expect_status(post_webhook(app, &event).await, StatusCode::OK).await;
    assert_eq!(second["duplicate"], true);

    assert_eq!(balance(&pool, sub.id).await, 7);
    assert!(ledger_has(&pool, "evt_2").await);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn same_checkout_session_under_new_event_id_is_not_applied_twice(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let sub = common::subscription(&pool, owner.user.id, 4, None).await;
    let app = common::build_test_app(pool.clone());

    let first = extra_days_checkout("evt_3", "cs_same", owner.user.id, sub.id);
    let second = extra_days_checkout("evt_4", "cs_same", owner.user.id, sub.id);
    expect_status(post_webhook(app.clone(), &first).await, StatusCode::OK).await;
    let ack = expect_status(post_webhook(app, &second).await, StatusCode::OK).await;
    assert_eq!(ack["duplicate"], true);

    assert_eq!(balance(&pool, sub.id).await, 7);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn extra_days_for_another_users_subscription_are_not_credited(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let other = common::customer(&pool, "other@example.com", true).await;
    let sub = common::subscription(&pool, owner.user.id, 4, None).await;
    let app = common::build_test_app(pool.clone());

    let event = extra_days_checkout("evt_5", "cs_5", other.user.id, sub.id);
    expect_status(post_webhook(app, &event).await, StatusCode::OK).await;

    assert_eq!(balance(&pool, sub.id).await, 4);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unusable_metadata_is_acknowledged_without_changes(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let app = common::build_test_app(pool.clone());

    let event = stripe_event(
        "evt_6",
        "checkout.session.completed",
        checkout_session(
            "cs_6",
            "payment",
            "paid",
            json!({ "type": "gift_card", "userId": owner.user.id.to_string() }),
        ),
    );
    expect_status(post_webhook(app, &event).await, StatusCode::OK).await;

    assert!(SubscriptionRepo::find_active_for_user(&pool, owner.user.id)
        .await
        .unwrap()
        .is_none());
    assert!(ledger_has(&pool, "evt_6").await);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn subscription_deleted_deactivates(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let sub = common::subscription(&pool, owner.user.id, 4, Some("sub_del")).await;
    let app = common::build_test_app(pool.clone());

    let event = stripe_event(
        "evt_7",
        "customer.subscription.deleted",
        subscription_object("sub_del", "canceled"),
    );
    expect_status(post_webhook(app, &event).await, StatusCode::OK).await;

    let row = SubscriptionRepo::find_by_id(&pool, sub.id).await.unwrap().unwrap();
    assert!(!row.is_active);
    assert!(row.cancelled_at.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn renewal_invoice_resets_balance(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let sub = common::subscription(&pool, owner.user.id, 4, Some("sub_renew")).await;
    sqlx::query("UPDATE subscriptions SET days_remaining = 1 WHERE id = $1")
        .bind(sub.id)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool.clone());

    let end = chrono::Utc::now().timestamp() + 30 * 24 * 3600;
    let event = stripe_event(
        "evt_8",
        "invoice.paid",
        invoice_object("in_8", "sub_renew", "subscription_cycle", end),
    );
    expect_status(post_webhook(app, &event).await, StatusCode::OK).await;

    let row = SubscriptionRepo::find_by_id(&pool, sub.id).await.unwrap().unwrap();
    assert_eq!(row.days_remaining, 4);
    assert_eq!(row.current_period_end.unwrap().timestamp(), end);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn first_invoice_does_not_reset_balance(pool: PgPool) {
    let owner = common::customer(&pool, "owner@example.com", true).await;
    let sub = common::subscription(&pool, owner.user.id, 4, Some("sub_new")).await;
    sqlx::query("UPDATE subscriptions SET days_remaining = 2 WHERE id = $1")
        .bind(sub.id)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool.clone());

    let end = chrono::Utc::now().timestamp() + 30 * 24 * 3600;
    let event = stripe_event(
        "evt_9",
        "invoice.paid",
        invoice_object("in_9", "sub_new", "subscription_create", end),
    );
    expect_status(post_webhook(app, &event).await, StatusCode::OK).await;

    assert_eq!(balance(&pool, sub.id).await, 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unhandled_event_types_are_acknowledged(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let event = stripe_event(
        "evt_10",
        "invoice.created",
        json!({ "id": "in_10", "object": "invoice" }),
    );
    let ack = expect_status(post_webhook(app, &event).await, StatusCode::OK).await;
    assert_eq!(ack["received"], true);
    assert!(ledger_has(&pool, "evt_10").await);
}
