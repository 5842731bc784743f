use sqlx::PgPool;

use skyway_domain::airplane::{Airplane, AirplaneInput};

use crate::{StoreError, StoreResult};

pub struct AirplaneRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct AirplaneRow {
    id: i64,
    model: String,
    manufacturer: String,
    capacity: i32,
}

impl From<AirplaneRow> for Airplane {
    fn from(row: AirplaneRow) -> Self {
        Airplane {
            id: row.id,
            model: row.model,
            manufacturer: row.manufacturer,
            capacity: row.capacity,
        }
    }
}

impl AirplaneRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &AirplaneInput) -> StoreResult<Airplane> {
        let row = sqlx::query_as::<_, AirplaneRow>(
            r#"
            INSERT INTO airplanes (model, manufacturer, capacity)
            VALUES ($1, $2, $3)
            RETURNING id, model, manufacturer, capacity
            "#,
        )
        .bind(&input.model)
        .bind(&input.manufacturer)
        .bind(input.capacity)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    pub async fn update(&self, id: i64, input: &AirplaneInput) -> StoreResult<Airplane> {
        let row = sqlx::query_as::<_, AirplaneRow>(
            r#"
            UPDATE airplanes SET model = $2, manufacturer = $3, capacity = $4
            WHERE id = $1
            RETURNING id, model, manufacturer, capacity
            "#,
        )
        .bind(id)
        .bind(&input.model)
        .bind(&input.manufacturer)
        .bind(input.capacity)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("airplane"))?;
        Ok(row.into())
    }

    pub async fn find(&self, id: i64) -> StoreResult<Airplane> {
        let row = sqlx::query_as::<_, AirplaneRow>(
            "SELECT id, model, manufacturer, capacity FROM airplanes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("airplane"))?;
        Ok(row.into())
    }

    pub async fn list(&self) -> StoreResult<Vec<Airplane>> {
        let rows = sqlx::query_as::<_, AirplaneRow>(
            "SELECT id, model, manufacturer, capacity FROM airplanes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Deletion is blocked while flights or seats reference the airplane;
    /// seats must be removed explicitly first (no silent cascade).
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let flights: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM flights WHERE airplane_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        if flights > 0 {
            return Err(StoreError::Conflict(format!(
                "airplane has {} dependent flight(s)",
                flights
            )));
        }

        let seats: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seats WHERE airplane_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        if seats > 0 {
            return Err(StoreError::Conflict(format!(
                "airplane has {} dependent seat(s)",
                seats
            )));
        }

        let result = sqlx::query("DELETE FROM airplanes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("airplane"));
        }
        Ok(())
    }
}
