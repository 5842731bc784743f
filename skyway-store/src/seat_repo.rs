use sqlx::PgPool;

use skyway_domain::seat::{Seat, SeatAvailability, SeatClass, SeatInput};

use crate::{is_unique_violation, StoreError, StoreResult};

pub struct SeatRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct SeatRow {
    id: i64,
    airplane_id: i64,
    seat_number: String,
    class: String,
    price_amount: i64,
}

impl SeatRow {
    fn into_seat(self) -> StoreResult<Seat> {
        Ok(Seat {
            id: self.id,
            airplane_id: self.airplane_id,
            seat_number: self.seat_number,
            class: SeatClass::parse(&self.class)?,
            price_amount: self.price_amount,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SeatOccupancyRow {
    id: i64,
    airplane_id: i64,
    seat_number: String,
    class: String,
    price_amount: i64,
    occupied: bool,
}

impl SeatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &SeatInput, class: SeatClass) -> StoreResult<Seat> {
        let airplane: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM airplanes WHERE id = $1")
            .bind(input.airplane_id)
            .fetch_one(&self.pool)
            .await?;
        if airplane == 0 {
            return Err(StoreError::NotFound("airplane"));
        }

        let row = sqlx::query_as::<_, SeatRow>(
            r#"
            INSERT INTO seats (airplane_id, seat_number, class, price_amount)
            VALUES ($1, $2, $3, $4)
            RETURNING id, airplane_id, seat_number, class, price_amount
            "#,
        )
        .bind(input.airplane_id)
        .bind(input.seat_number.trim())
        .bind(class.as_str())
        .bind(input.price_amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict(format!(
                    "seat {} already exists on this airplane",
                    input.seat_number.trim()
                ))
            } else {
                StoreError::Database(e)
            }
        })?;

        row.into_seat()
    }

    pub async fn update(&self, id: i64, input: &SeatInput, class: SeatClass) -> StoreResult<Seat> {
        let row = sqlx::query_as::<_, SeatRow>(
            r#"
            UPDATE seats SET seat_number = $2, class = $3, price_amount = $4
            WHERE id = $1
            RETURNING id, airplane_id, seat_number, class, price_amount
            "#,
        )
        .bind(id)
        .bind(input.seat_number.trim())
        .bind(class.as_str())
        .bind(input.price_amount)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict("another seat already uses that number".to_string())
            } else {
                StoreError::Database(e)
            }
        })?
        .ok_or(StoreError::NotFound("seat"))?;

        row.into_seat()
    }

    pub async fn find(&self, id: i64) -> StoreResult<Seat> {
        let row = sqlx::query_as::<_, SeatRow>(
            "SELECT id, airplane_id, seat_number, class, price_amount FROM seats WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("seat"))?;
        row.into_seat()
    }

    pub async fn list_by_airplane(&self, airplane_id: i64) -> StoreResult<Vec<Seat>> {
        let rows = sqlx::query_as::<_, SeatRow>(
            "SELECT id, airplane_id, seat_number, class, price_amount
             FROM seats WHERE airplane_id = $1 ORDER BY seat_number",
        )
        .bind(airplane_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(SeatRow::into_seat).collect()
    }

    /// Seats of the flight's airplane, with occupancy derived by joining
    /// passengers of non-cancelled bookings on this flight.
    pub async fn list_for_flight(&self, flight_id: i64) -> StoreResult<Vec<SeatAvailability>> {
        let rows = sqlx::query_as::<_, SeatOccupancyRow>(
            r#"
            SELECT s.id, s.airplane_id, s.seat_number, s.class, s.price_amount,
                   EXISTS (
                       SELECT 1 FROM passengers p
                       JOIN bookings b ON b.id = p.booking_id
                       WHERE p.seat_id = s.id
                         AND p.flight_id = f.id
                         AND b.status <> 'cancelled'
                   ) AS occupied
            FROM flights f
            JOIN seats s ON s.airplane_id = f.airplane_id
            WHERE f.id = $1
            ORDER BY s.seat_number
            "#,
        )
        .bind(flight_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                Ok(SeatAvailability {
                    seat: Seat {
                        id: r.id,
                        airplane_id: r.airplane_id,
                        seat_number: r.seat_number,
                        class: SeatClass::parse(&r.class)?,
                        price_amount: r.price_amount,
                    },
                    occupied: r.occupied,
                })
            })
            .collect()
    }

    /// Blocked while passenger rows reference the seat. Cancelled bookings
    /// keep their rows, so those still pin the seat (the FK would reject the
    /// delete anyway; this surfaces it as a conflict instead of a 500).
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let held: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM passengers WHERE seat_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if held > 0 {
            return Err(StoreError::Conflict(format!(
                "seat is referenced by {} booking passenger(s)",
                held
            )));
        }

        let result = sqlx::query("DELETE FROM seats WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("seat"));
        }
        Ok(())
    }
}
