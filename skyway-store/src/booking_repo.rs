use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

use skyway_domain::booking::{Booking, BookingStatus, Gender};
use skyway_domain::fares;

use crate::{Page, StoreError, StoreResult};

pub struct BookingRepository {
    pool: PgPool,
}

/// Passenger ready for insertion: validated upstream, passport already
/// sealed by the vault.
pub struct PreparedPassenger {
    pub first_name: String,
    pub last_name: String,
    pub passport_sealed: Vec<u8>,
    pub nationality: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub seat_id: i64,
}

/// Passenger as stored, with the sealed passport blob and the joined seat
/// number. Decryption happens at the API layer.
#[derive(sqlx::FromRow)]
pub struct PassengerRecord {
    pub id: i64,
    pub booking_id: i64,
    pub flight_id: i64,
    pub seat_id: i64,
    pub seat_number: String,
    pub first_name: String,
    pub last_name: String,
    pub passport_sealed: Vec<u8>,
    pub nationality: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i64,
    client_id: i64,
    flight_id: i64,
    status: String,
    priority_support: bool,
    fast_track: bool,
    total_amount: i64,
    currency: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl BookingRow {
    fn into_booking(self) -> StoreResult<Booking> {
        Ok(Booking {
            id: self.id,
            client_id: self.client_id,
            flight_id: self.flight_id,
            status: BookingStatus::parse(&self.status)?,
            priority_support: self.priority_support,
            fast_track: self.fast_track,
            total_amount: self.total_amount,
            currency: self.currency,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SeatForBooking {
    airplane_id: i64,
    seat_number: String,
    price_amount: i64,
}

const BOOKING_COLUMNS: &str = "id, client_id, flight_id, status, priority_support, fast_track, \
     total_amount, currency, created_at, updated_at";

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the booking and all passenger rows in one transaction.
    /// Seat-uniqueness is enforced here, not by an advisory pre-check: each
    /// passenger insert is conditional on no passenger of a non-cancelled
    /// booking already holding the (flight, seat) pair, and competing
    /// transactions are serialized per seat with an advisory lock so neither
    /// can sneak past the other's uncommitted insert. Any failure rolls the
    /// whole booking back.
    pub async fn create(
        &self,
        client_id: i64,
        flight_id: i64,
        passengers: Vec<PreparedPassenger>,
        priority_support: bool,
        fast_track: bool,
        currency: &str,
    ) -> StoreResult<Booking> {
        // Claim seats in a fixed order so two bookings over the same seats
        // always take their advisory locks the same way and cannot deadlock.
        let mut passengers = passengers;
        passengers.sort_by_key(|p| p.seat_id);

        let mut tx = self.pool.begin().await?;

        let airplane_id: i64 =
            sqlx::query_scalar("SELECT airplane_id FROM flights WHERE id = $1")
                .bind(flight_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(StoreError::NotFound("flight"))?;

        let mut seat_prices = Vec::with_capacity(passengers.len());
        for p in &passengers {
            let seat = sqlx::query_as::<_, SeatForBooking>(
                "SELECT airplane_id, seat_number, price_amount FROM seats WHERE id = $1",
            )
            .bind(p.seat_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound("seat"))?;

            if seat.airplane_id != airplane_id {
                return Err(StoreError::Conflict(format!(
                    "seat {} does not belong to this flight's airplane",
                    seat.seat_number
                )));
            }
            seat_prices.push(seat.price_amount);
        }

        let total = fares::booking_total(&seat_prices, priority_support, fast_track);

        let booking = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            INSERT INTO bookings (client_id, flight_id, status, priority_support, fast_track,
                                  total_amount, currency)
            VALUES ($1, $2, 'pending', $3, $4, $5, $6)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(client_id)
        .bind(flight_id)
        .bind(priority_support)
        .bind(fast_track)
        .bind(total)
        .bind(currency)
        .fetch_one(&mut *tx)
        .await?;

        for p in &passengers {
            Self::insert_passenger(&mut tx, booking.id, flight_id, p).await?;
        }

        tx.commit().await?;
        booking.into_booking()
    }

    async fn insert_passenger(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i64,
        flight_id: i64,
        p: &PreparedPassenger,
    ) -> StoreResult<()> {
        // Serialize competing claims on this seat for the rest of the
        // transaction; released automatically at commit/rollback. Single
        // bigint key form, since the two-int form truncates 64-bit ids.
        let lock_key = flight_id.wrapping_shl(32) ^ p.seat_id;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(lock_key)
            .execute(&mut **tx)
            .await?;

        let result = sqlx::query(
            r#"
            INSERT INTO passengers (booking_id, flight_id, seat_id, first_name, last_name,
                                    passport_sealed, nationality, gender, date_of_birth)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9
            WHERE NOT EXISTS (
                SELECT 1 FROM passengers x
                JOIN bookings b ON b.id = x.booking_id
                WHERE x.flight_id = $2 AND x.seat_id = $3 AND b.status <> 'cancelled'
            )
            "#,
        )
        .bind(booking_id)
        .bind(flight_id)
        .bind(p.seat_id)
        .bind(&p.first_name)
        .bind(&p.last_name)
        .bind(&p.passport_sealed)
        .bind(&p.nationality)
        .bind(p.gender.as_str())
        .bind(p.date_of_birth)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!(
                "seat {} is already taken on this flight",
                p.seat_id
            )));
        }
        Ok(())
    }

    pub async fn find(&self, id: i64) -> StoreResult<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("booking"))?;
        row.into_booking()
    }

    pub async fn passengers_of(&self, booking_id: i64) -> StoreResult<Vec<PassengerRecord>> {
        let rows = sqlx::query_as::<_, PassengerRecord>(
            r#"
            SELECT p.id, p.booking_id, p.flight_id, p.seat_id, s.seat_number,
                   p.first_name, p.last_name, p.passport_sealed, p.nationality,
                   p.gender, p.date_of_birth
            FROM passengers p
            JOIN seats s ON s.id = p.seat_id
            WHERE p.booking_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_client(
        &self,
        client_id: i64,
        page: Page,
    ) -> StoreResult<(Vec<Booking>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE client_id = $1")
            .bind(client_id)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings WHERE client_id = $1
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            BOOKING_COLUMNS
        ))
        .bind(client_id)
        .bind(page.per_page)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let bookings = rows
            .into_iter()
            .map(BookingRow::into_booking)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok((bookings, total))
    }

    pub async fn list_all(&self, page: Page) -> StoreResult<(Vec<Booking>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            BOOKING_COLUMNS
        ))
        .bind(page.per_page)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let bookings = rows
            .into_iter()
            .map(BookingRow::into_booking)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok((bookings, total))
    }

    /// Recomputes the total from the booking's live seat assignments plus
    /// the new flags.
    pub async fn update_flags(
        &self,
        id: i64,
        priority_support: bool,
        fast_track: bool,
    ) -> StoreResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let seat_prices: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT s.price_amount FROM passengers p
            JOIN seats s ON s.id = p.seat_id
            WHERE p.booking_id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let total = fares::booking_total(&seat_prices, priority_support, fast_track);

        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            UPDATE bookings SET priority_support = $2, fast_track = $3, total_amount = $4,
                   updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(id)
        .bind(priority_support)
        .bind(fast_track)
        .bind(total)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound("booking"))?;

        tx.commit().await?;
        row.into_booking()
    }

    /// Status changes never delete rows; cancellation keeps passengers and
    /// payments intact and availability is re-derived from joins.
    pub async fn update_status(&self, id: i64, status: BookingStatus) -> StoreResult<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("booking"))?;
        row.into_booking()
    }

    /// Flips the status only when the current status still matches `from`,
    /// so a booking cancelled by a concurrent request cannot be resurrected
    /// by a payment committing after it. Zero rows is a conflict.
    pub async fn transition_status_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
        from: BookingStatus,
        to: BookingStatus,
    ) -> StoreResult<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET status = $3, updated_at = NOW()
             WHERE id = $1 AND status = $2 RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| {
            StoreError::Conflict(format!("booking is no longer {}", from.as_str()))
        })?;
        row.into_booking()
    }
}
