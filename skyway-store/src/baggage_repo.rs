use sqlx::PgPool;

use skyway_domain::baggage::{Baggage, BaggageInput, BaggageStatus};

use crate::{is_unique_violation, StoreError, StoreResult};

pub struct BaggageRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct BaggageRow {
    id: i64,
    booking_id: i64,
    passenger_id: i64,
    tag_number: String,
    weight_kg: f64,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl BaggageRow {
    fn into_baggage(self) -> StoreResult<Baggage> {
        Ok(Baggage {
            id: self.id,
            booking_id: self.booking_id,
            passenger_id: self.passenger_id,
            tag_number: self.tag_number,
            weight_kg: self.weight_kg,
            status: BaggageStatus::parse(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const BAGGAGE_COLUMNS: &str =
    "id, booking_id, passenger_id, tag_number, weight_kg, status, created_at, updated_at";

impl BaggageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &BaggageInput, tag_number: &str) -> StoreResult<Baggage> {
        let belongs: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM passengers WHERE id = $1 AND booking_id = $2",
        )
        .bind(input.passenger_id)
        .bind(input.booking_id)
        .fetch_one(&self.pool)
        .await?;
        if belongs == 0 {
            return Err(StoreError::NotFound("passenger on this booking"));
        }

        let row = sqlx::query_as::<_, BaggageRow>(&format!(
            r#"
            INSERT INTO baggage (booking_id, passenger_id, tag_number, weight_kg, status)
            VALUES ($1, $2, $3, $4, 'checked_in')
            RETURNING {}
            "#,
            BAGGAGE_COLUMNS
        ))
        .bind(input.booking_id)
        .bind(input.passenger_id)
        .bind(tag_number)
        .bind(input.weight_kg)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict(format!("baggage tag {} already exists", tag_number))
            } else {
                StoreError::Database(e)
            }
        })?;

        row.into_baggage()
    }

    pub async fn update_status(&self, id: i64, status: BaggageStatus) -> StoreResult<Baggage> {
        let row = sqlx::query_as::<_, BaggageRow>(&format!(
            "UPDATE baggage SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            BAGGAGE_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("baggage"))?;

        row.into_baggage()
    }

    pub async fn list_by_booking(&self, booking_id: i64) -> StoreResult<Vec<Baggage>> {
        let rows = sqlx::query_as::<_, BaggageRow>(&format!(
            "SELECT {} FROM baggage WHERE booking_id = $1 ORDER BY id",
            BAGGAGE_COLUMNS
        ))
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BaggageRow::into_baggage).collect()
    }
}
