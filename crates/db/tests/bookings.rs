//! Booking day accounting against a real database.

mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use kennel_core::types::{Date, DbId};
use kennel_db::models::booking::{BookingOutcome, CreateBookings};
use kennel_db::repositories::{BookingRepo, SubscriptionRepo};
use sqlx::PgPool;

fn days_ahead(n: i64) -> Date {
    Utc::now().date_naive() + Duration::days(n)
}

fn request(user_id: DbId, subscription_id: DbId, dog_id: DbId, dates: Vec<Date>) -> CreateBookings {
    let days = dates.len() as i32;
    CreateBookings {
        user_id,
        subscription_id,
        dog_ids: vec![dog_id],
        dates,
        session_type: "full_day".into(),
        session_time: None,
        notes: None,
        days,
        daily_capacity: 20,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_booking_debits_balance(pool: PgPool) {
    let owner = common::customer(&pool, "ana@example.com", true).await;
    let dog = common::approved_dog(&pool, owner.user.id, "Maple").await;
    let sub = common::subscription(&pool, owner.user.id, 4).await;

    let input = request(owner.user.id, sub.id, dog.id, vec![days_ahead(3), days_ahead(2)]);
    let outcome = BookingRepo::create_with_debit(&pool, &input).await.unwrap();
    assert_matches!(outcome, BookingOutcome::Created { bookings, days_remaining } => {
        assert_eq!(bookings.len(), 2);
        assert_eq!(days_remaining, 2);
        assert!(bookings[0].booking_date < bookings[1].booking_date);
        assert_eq!(bookings[0].dog_ids, vec![dog.id]);
    });
}

#[sqlx::test(migrations = "./migrations")]
async fn test_insufficient_balance_writes_nothing(pool: PgPool) {
    let owner = common::customer(&pool, "ana@example.com", true).await;
    let dog = common::approved_dog(&pool, owner.user.id, "Maple").await;
    let sub = common::subscription(&pool, owner.user.id, 1).await;

    let input = request(owner.user.id, sub.id, dog.id, vec![days_ahead(2), days_ahead(3)]);
    let outcome = BookingRepo::create_with_debit(&pool, &input).await.unwrap();
    assert_matches!(outcome, BookingOutcome::InsufficientDays);

    let sub = SubscriptionRepo::find_by_id(&pool, sub.id).await.unwrap().unwrap();
    assert_eq!(sub.days_remaining, 1);
    assert!(BookingRepo::list_for_user(&pool, owner.user.id, None).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_requests_never_overspend(pool: PgPool) {
    let owner = common::customer(&pool, "ana@example.com", true).await;
    let dog = common::approved_dog(&pool, owner.user.id, "Maple").await;
    let sub = common::subscription(&pool, owner.user.id, 1).await;

    let a = request(owner.user.id, sub.id, dog.id, vec![days_ahead(2)]);
    let b = request(owner.user.id, sub.id, dog.id, vec![days_ahead(3)]);
    let (ra, rb) = tokio::join!(
        BookingRepo::create_with_debit(&pool, &a),
        BookingRepo::create_with_debit(&pool, &b),
    );

    let created = [ra.unwrap(), rb.unwrap()]
        .into_iter()
        .filter(|o| matches!(o, BookingOutcome::Created { .. }))
        .count();
    assert_eq!(created, 1);

    let sub = SubscriptionRepo::find_by_id(&pool, sub.id).await.unwrap().unwrap();
    assert_eq!(sub.days_remaining, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_full_date_is_rejected(pool: PgPool) {
    let ana = common::customer(&pool, "ana@example.com", true).await;
    let ben = common::customer(&pool, "ben@example.com", true).await;
    let maple = common::approved_dog(&pool, ana.user.id, "Maple").await;
    let rex = common::approved_dog(&pool, ben.user.id, "Rex").await;
    let sub_a = common::subscription(&pool, ana.user.id, 4).await;
    let sub_b = common::subscription(&pool, ben.user.id, 4).await;

    let date = days_ahead(5);
    let mut first = request(ana.user.id, sub_a.id, maple.id, vec![date]);
    first.daily_capacity = 1;
    assert_matches!(
        BookingRepo::create_with_debit(&pool, &first).await.unwrap(),
        BookingOutcome::Created { .. }
    );

    let mut second = request(ben.user.id, sub_b.id, rex.id, vec![date]);
    second.daily_capacity = 1;
    assert_matches!(
        BookingRepo::create_with_debit(&pool, &second).await.unwrap(),
        BookingOutcome::DateFull(d) if d == date
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_same_date_twice_is_unique_violation(pool: PgPool) {
    let owner = common::customer(&pool, "ana@example.com", true).await;
    let dog = common::approved_dog(&pool, owner.user.id, "Maple").await;
    let sub = common::subscription(&pool, owner.user.id, 4).await;

    let input = request(owner.user.id, sub.id, dog.id, vec![days_ahead(2)]);
    BookingRepo::create_with_debit(&pool, &input).await.unwrap();
    let err = BookingRepo::create_with_debit(&pool, &input).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.constraint() == Some("uq_bookings_user_date"));

    // The failed attempt rolled its debit back.
    let sub = SubscriptionRepo::find_by_id(&pool, sub.id).await.unwrap().unwrap();
    assert_eq!(sub.days_remaining, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cancel_refunds_once(pool: PgPool) {
    let owner = common::customer(&pool, "ana@example.com", true).await;
    let dog = common::approved_dog(&pool, owner.user.id, "Maple").await;
    let sub = common::subscription(&pool, owner.user.id, 4).await;

    let input = request(owner.user.id, sub.id, dog.id, vec![days_ahead(2)]);
    let BookingOutcome::Created { bookings, .. } =
        BookingRepo::create_with_debit(&pool, &input).await.unwrap()
    else {
        panic!("expected bookings");
    };
    let id = bookings[0].id;

    let (cancelled, refunded) = BookingRepo::cancel(&pool, id, owner.user.id, true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cancelled.status, "cancelled");
    assert!(refunded);
    assert!(BookingRepo::cancel(&pool, id, owner.user.id, true).await.unwrap().is_none());

    let sub = SubscriptionRepo::find_by_id(&pool, sub.id).await.unwrap().unwrap();
    assert_eq!(sub.days_remaining, 4);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_check_in_then_out(pool: PgPool) {
    let owner = common::customer(&pool, "ana@example.com", true).await;
    let staff = common::customer(&pool, "staff@example.com", true).await;
    let dog = common::approved_dog(&pool, owner.user.id, "Maple").await;
    let sub = common::subscription(&pool, owner.user.id, 4).await;

    let today = Utc::now().date_naive();
    let input = request(owner.user.id, sub.id, dog.id, vec![today]);
    let BookingOutcome::Created { bookings, .. } =
        BookingRepo::create_with_debit(&pool, &input).await.unwrap()
    else {
        panic!("expected bookings");
    };
    let id = bookings[0].id;

    assert!(BookingRepo::check_out(&pool, id, staff.user.id).await.unwrap().is_none());
    let checked_in = BookingRepo::check_in(&pool, id, staff.user.id).await.unwrap().unwrap();
    assert!(checked_in.checked_in);
    assert_eq!(checked_in.checked_in_by, Some(staff.user.id));
    assert!(BookingRepo::check_in(&pool, id, staff.user.id).await.unwrap().is_none());

    // Checked-in bookings can no longer be cancelled.
    assert!(BookingRepo::cancel(&pool, id, owner.user.id, false).await.unwrap().is_none());

    let out = BookingRepo::check_out(&pool, id, staff.user.id).await.unwrap().unwrap();
    assert!(out.checked_out);

    let roster = BookingRepo::roster_for_date(&pool, today).await.unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].owner_name, owner.profile.full_name);
}
