//! Repository for the `bookings` table.
//!
//! Booking creation debits the subscription balance in the same transaction
//! that inserts the rows. The debit is a conditional update
//! (`days_remaining >= n`), so two concurrent requests can never spend the
//! same day twice. Daily capacity is enforced under a per-date advisory lock.

use chrono::Datelike;
use kennel_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::booking::{Booking, BookingOutcome, CreateBookings, RosterEntry};

const COLUMNS: &str = "id, user_id, subscription_id, dog_ids, booking_date, session_type, \
    session_time, status, checked_in, checked_in_at, checked_in_by, checked_out, \
    checked_out_at, checked_out_by, cancelled_at, notes, created_at, updated_at";

/// Advisory-lock namespace for per-date capacity checks.
const CAPACITY_LOCK_NAMESPACE: i32 = 0x0B00;

/// Provides booking writes and roster queries.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert one booking per date and debit `input.days` from the
    /// subscription, all or nothing.
    pub async fn create_with_debit(
        pool: &PgPool,
        input: &CreateBookings,
    ) -> Result<BookingOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut dates = input.dates.clone();
        dates.sort();

        for date in &dates {
            // Locks are taken in date order so overlapping requests cannot deadlock.
            sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
                .bind(CAPACITY_LOCK_NAMESPACE)
                .bind(date.num_days_from_ce())
                .execute(&mut *tx)
                .await?;

            let booked: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM bookings WHERE booking_date = $1 AND status = 'booked'",
            )
            .bind(date)
            .fetch_one(&mut *tx)
            .await?;

            if booked >= input.daily_capacity {
                tracing::debug!(%date, booked, "Booking date at capacity");
                tx.rollback().await?;
                return Ok(BookingOutcome::DateFull(*date));
            }
        }

        let remaining: Option<i32> = sqlx::query_scalar(
            "UPDATE subscriptions SET days_remaining = days_remaining - $3
             WHERE id = $1 AND user_id = $2 AND is_active = true AND days_remaining >= $3
             RETURNING days_remaining",
        )
        .bind(input.subscription_id)
        .bind(input.user_id)
        .bind(input.days)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(days_remaining) = remaining else {
            tracing::debug!(
                subscription_id = input.subscription_id,
                days = input.days,
                "Subscription balance too low for booking",
            );
            tx.rollback().await?;
            return Ok(BookingOutcome::InsufficientDays);
        };

        let query = format!(
            "INSERT INTO bookings
                (user_id, subscription_id, dog_ids, booking_date, session_type, session_time, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let mut bookings = Vec::with_capacity(dates.len());
        for date in &dates {
            let booking = sqlx::query_as::<_, Booking>(&query)
                .bind(input.user_id)
                .bind(input.subscription_id)
                .bind(&input.dog_ids)
                .bind(date)
                .bind(&input.session_type)
                .bind(&input.session_time)
                .bind(&input.notes)
                .fetch_one(&mut *tx)
                .await?;
            bookings.push(booking);
        }

        tx.commit().await?;
        Ok(BookingOutcome::Created {
            bookings,
            days_remaining,
        })
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A customer's bookings, optionally only those on or after `from`.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        from: Option<Date>,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE user_id = $1 AND ($2::date IS NULL OR booking_date >= $2)
             ORDER BY booking_date ASC, id ASC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(user_id)
            .bind(from)
            .fetch_all(pool)
            .await
    }

    /// Live bookings for one date, with owner names, for the staff roster.
    pub async fn roster_for_date(pool: &PgPool, date: Date) -> Result<Vec<RosterEntry>, sqlx::Error> {
        sqlx::query_as::<_, RosterEntry>(
            "SELECT b.id, b.user_id, p.full_name AS owner_name, b.dog_ids, b.booking_date,
                    b.session_type, b.session_time, b.checked_in, b.checked_in_at,
                    b.checked_out, b.checked_out_at, b.notes
             FROM bookings b
             JOIN profiles p ON p.id = b.user_id
             WHERE b.booking_date = $1 AND b.status = 'booked'
             ORDER BY p.full_name, b.id",
        )
        .bind(date)
        .fetch_all(pool)
        .await
    }

    /// Number of live bookings on or after `from`.
    pub async fn count_upcoming(
        pool: &PgPool,
        user_id: DbId,
        from: Date,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings
             WHERE user_id = $1 AND status = 'booked' AND booking_date >= $2",
        )
        .bind(user_id)
        .bind(from)
        .fetch_one(pool)
        .await
    }

    /// Cancel a customer's booking that has not been checked in.
    ///
    /// When `refund` is set the day goes back to the subscription the booking
    /// drew from, provided it is still active. Returns the cancelled row and
    /// whether a day was returned, or `None` if nothing was cancellable.
    pub async fn cancel(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        refund: bool,
    ) -> Result<Option<(Booking, bool)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE bookings SET status = 'cancelled', cancelled_at = NOW()
             WHERE id = $1 AND user_id = $2 AND status = 'booked' AND checked_in = false
             RETURNING {COLUMNS}"
        );
        let Some(booking) = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let mut refunded = false;
        if refund {
            let result = sqlx::query(
                "UPDATE subscriptions SET days_remaining = days_remaining + 1
                 WHERE id = $1 AND is_active = true",
            )
            .bind(booking.subscription_id)
            .execute(&mut *tx)
            .await?;
            refunded = result.rows_affected() > 0;
        }

        tx.commit().await?;
        Ok(Some((booking, refunded)))
    }

    /// Mark a live booking as checked in. Returns `None` if it was not in
    /// the booked state.
    pub async fn check_in(
        pool: &PgPool,
        id: DbId,
        staff_id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET checked_in = true, checked_in_at = NOW(), checked_in_by = $2
             WHERE id = $1 AND status = 'booked' AND checked_in = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(staff_id)
            .fetch_optional(pool)
            .await
    }

    /// Mark a checked-in booking as checked out. Returns `None` if it was
    /// not checked in or already out.
    pub async fn check_out(
        pool: &PgPool,
        id: DbId,
        staff_id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET checked_out = true, checked_out_at = NOW(), checked_out_by = $2
             WHERE id = $1 AND status = 'booked' AND checked_in = true AND checked_out = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(staff_id)
            .fetch_optional(pool)
            .await
    }
}
