use sqlx::PgPool;

use skyway_domain::airport::Airport;
use skyway_domain::flight::{Flight, FlightDetail, FlightInput, FlightSearch, FlightStatus};

use crate::{Page, StoreError, StoreResult};

pub struct FlightRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    id: i64,
    flight_number: String,
    airplane_id: i64,
    origin_airport_id: i64,
    destination_airport_id: i64,
    departure_time: chrono::DateTime<chrono::Utc>,
    arrival_time: chrono::DateTime<chrono::Utc>,
    status: String,
}

impl FlightRow {
    fn into_flight(self) -> StoreResult<Flight> {
        Ok(Flight {
            id: self.id,
            flight_number: self.flight_number,
            airplane_id: self.airplane_id,
            origin_airport_id: self.origin_airport_id,
            destination_airport_id: self.destination_airport_id,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            status: FlightStatus::parse(&self.status)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FlightDetailRow {
    id: i64,
    flight_number: String,
    airplane_id: i64,
    origin_airport_id: i64,
    destination_airport_id: i64,
    departure_time: chrono::DateTime<chrono::Utc>,
    arrival_time: chrono::DateTime<chrono::Utc>,
    status: String,
    origin_iata: String,
    origin_name: String,
    origin_city: String,
    origin_country: String,
    dest_iata: String,
    dest_name: String,
    dest_city: String,
    dest_country: String,
    airplane_model: String,
    airplane_capacity: i32,
}

const FLIGHT_COLUMNS: &str = "id, flight_number, airplane_id, origin_airport_id, \
     destination_airport_id, departure_time, arrival_time, status";

impl FlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Filtered, paginated search. Filters that are `None` collapse to
    /// always-true predicates so one statement covers every combination.
    pub async fn search(
        &self,
        search: &FlightSearch,
        page: Page,
    ) -> StoreResult<(Vec<Flight>, i64)> {
        let origin = search.origin.as_ref().map(|s| s.trim().to_uppercase());
        let destination = search.destination.as_ref().map(|s| s.trim().to_uppercase());

        let where_clause = r#"
            FROM flights f
            JOIN airports o ON o.id = f.origin_airport_id
            JOIN airports d ON d.id = f.destination_airport_id
            WHERE ($1::text IS NULL OR o.iata_code = $1)
              AND ($2::text IS NULL OR d.iata_code = $2)
              AND ($3::date IS NULL OR DATE(f.departure_time) = $3)
              AND ($4::text IS NULL OR f.status = $4)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) {}", where_clause))
            .bind(&origin)
            .bind(&destination)
            .bind(search.date)
            .bind(&search.status)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, FlightRow>(&format!(
            "SELECT f.id, f.flight_number, f.airplane_id, f.origin_airport_id, \
             f.destination_airport_id, f.departure_time, f.arrival_time, f.status \
             {} ORDER BY f.departure_time LIMIT $5 OFFSET $6",
            where_clause
        ))
        .bind(&origin)
        .bind(&destination)
        .bind(search.date)
        .bind(&search.status)
        .bind(page.per_page)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let flights = rows
            .into_iter()
            .map(FlightRow::into_flight)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok((flights, total))
    }

    pub async fn find(&self, id: i64) -> StoreResult<Flight> {
        let row = sqlx::query_as::<_, FlightRow>(&format!(
            "SELECT {} FROM flights WHERE id = $1",
            FLIGHT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("flight"))?;
        row.into_flight()
    }

    pub async fn find_detail(&self, id: i64) -> StoreResult<FlightDetail> {
        let row = sqlx::query_as::<_, FlightDetailRow>(
            r#"
            SELECT f.id, f.flight_number, f.airplane_id, f.origin_airport_id,
                   f.destination_airport_id, f.departure_time, f.arrival_time, f.status,
                   o.iata_code AS origin_iata, o.name AS origin_name,
                   o.city AS origin_city, o.country AS origin_country,
                   d.iata_code AS dest_iata, d.name AS dest_name,
                   d.city AS dest_city, d.country AS dest_country,
                   a.model AS airplane_model, a.capacity AS airplane_capacity
            FROM flights f
            JOIN airports o ON o.id = f.origin_airport_id
            JOIN airports d ON d.id = f.destination_airport_id
            JOIN airplanes a ON a.id = f.airplane_id
            WHERE f.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("flight"))?;

        Ok(FlightDetail {
            flight: Flight {
                id: row.id,
                flight_number: row.flight_number,
                airplane_id: row.airplane_id,
                origin_airport_id: row.origin_airport_id,
                destination_airport_id: row.destination_airport_id,
                departure_time: row.departure_time,
                arrival_time: row.arrival_time,
                status: FlightStatus::parse(&row.status)?,
            },
            origin: Airport {
                id: row.origin_airport_id,
                iata_code: row.origin_iata,
                name: row.origin_name,
                city: row.origin_city,
                country: row.origin_country,
            },
            destination: Airport {
                id: row.destination_airport_id,
                iata_code: row.dest_iata,
                name: row.dest_name,
                city: row.dest_city,
                country: row.dest_country,
            },
            airplane_model: row.airplane_model,
            airplane_capacity: row.airplane_capacity,
        })
    }

    pub async fn create(&self, input: &FlightInput) -> StoreResult<Flight> {
        for (table, id, entity) in [
            ("airplanes", input.airplane_id, "airplane"),
            ("airports", input.origin_airport_id, "origin airport"),
            ("airports", input.destination_airport_id, "destination airport"),
        ] {
            let exists: i64 =
                sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {} WHERE id = $1", table))
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;
            if exists == 0 {
                tracing::debug!(entity, id, "flight reference check failed");
                return Err(StoreError::NotFound("referenced airplane or airport"));
            }
        }

        let row = sqlx::query_as::<_, FlightRow>(&format!(
            r#"
            INSERT INTO flights (flight_number, airplane_id, origin_airport_id,
                                 destination_airport_id, departure_time, arrival_time, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'scheduled')
            RETURNING {}
            "#,
            FLIGHT_COLUMNS
        ))
        .bind(&input.flight_number)
        .bind(input.airplane_id)
        .bind(input.origin_airport_id)
        .bind(input.destination_airport_id)
        .bind(input.departure_time)
        .bind(input.arrival_time)
        .fetch_one(&self.pool)
        .await?;

        row.into_flight()
    }

    pub async fn update(&self, id: i64, input: &FlightInput) -> StoreResult<Flight> {
        let row = sqlx::query_as::<_, FlightRow>(&format!(
            r#"
            UPDATE flights SET flight_number = $2, airplane_id = $3, origin_airport_id = $4,
                   destination_airport_id = $5, departure_time = $6, arrival_time = $7
            WHERE id = $1
            RETURNING {}
            "#,
            FLIGHT_COLUMNS
        ))
        .bind(id)
        .bind(&input.flight_number)
        .bind(input.airplane_id)
        .bind(input.origin_airport_id)
        .bind(input.destination_airport_id)
        .bind(input.departure_time)
        .bind(input.arrival_time)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("flight"))?;

        row.into_flight()
    }

    pub async fn update_status(&self, id: i64, status: FlightStatus) -> StoreResult<Flight> {
        let row = sqlx::query_as::<_, FlightRow>(&format!(
            "UPDATE flights SET status = $2 WHERE id = $1 RETURNING {}",
            FLIGHT_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("flight"))?;

        row.into_flight()
    }

    /// Deletion is blocked while non-cancelled bookings exist.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE flight_id = $1 AND status <> 'cancelled'",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if active > 0 {
            return Err(StoreError::Conflict(format!(
                "flight has {} active booking(s)",
                active
            )));
        }

        // Cancelled bookings keep their rows, and the FK would turn the
        // delete into a database error. Surface that as a conflict too.
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE flight_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        if total > 0 {
            return Err(StoreError::Conflict(
                "flight is referenced by historical bookings".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM flights WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("flight"));
        }
        Ok(())
    }
}
