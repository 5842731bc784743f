use sqlx::PgPool;

use skyway_domain::airport::{Airport, AirportInput};

use crate::{is_unique_violation, StoreError, StoreResult};

pub struct AirportRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct AirportRow {
    id: i64,
    iata_code: String,
    name: String,
    city: String,
    country: String,
}

impl From<AirportRow> for Airport {
    fn from(row: AirportRow) -> Self {
        Airport {
            id: row.id,
            iata_code: row.iata_code,
            name: row.name,
            city: row.city,
            country: row.country,
        }
    }
}

impl AirportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &AirportInput) -> StoreResult<Airport> {
        let row = sqlx::query_as::<_, AirportRow>(
            r#"
            INSERT INTO airports (iata_code, name, city, country)
            VALUES (UPPER($1), $2, $3, $4)
            RETURNING id, iata_code, name, city, country
            "#,
        )
        .bind(input.iata_code.trim())
        .bind(&input.name)
        .bind(&input.city)
        .bind(&input.country)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict(format!(
                    "airport with IATA code {} already exists",
                    input.iata_code.trim().to_uppercase()
                ))
            } else {
                StoreError::Database(e)
            }
        })?;

        Ok(row.into())
    }

    pub async fn update(&self, id: i64, input: &AirportInput) -> StoreResult<Airport> {
        let row = sqlx::query_as::<_, AirportRow>(
            r#"
            UPDATE airports SET iata_code = UPPER($2), name = $3, city = $4, country = $5
            WHERE id = $1
            RETURNING id, iata_code, name, city, country
            "#,
        )
        .bind(id)
        .bind(input.iata_code.trim())
        .bind(&input.name)
        .bind(&input.city)
        .bind(&input.country)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict("another airport already uses that IATA code".to_string())
            } else {
                StoreError::Database(e)
            }
        })?
        .ok_or(StoreError::NotFound("airport"))?;

        Ok(row.into())
    }

    pub async fn find(&self, id: i64) -> StoreResult<Airport> {
        let row = sqlx::query_as::<_, AirportRow>(
            "SELECT id, iata_code, name, city, country FROM airports WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("airport"))?;
        Ok(row.into())
    }

    pub async fn list(&self) -> StoreResult<Vec<Airport>> {
        let rows = sqlx::query_as::<_, AirportRow>(
            "SELECT id, iata_code, name, city, country FROM airports ORDER BY iata_code",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Refuses deletion while flights route through the airport.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let flights: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM flights WHERE origin_airport_id = $1 OR destination_airport_id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if flights > 0 {
            return Err(StoreError::Conflict(format!(
                "airport has {} dependent flight(s)",
                flights
            )));
        }

        let result = sqlx::query("DELETE FROM airports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("airport"));
        }
        Ok(())
    }
}
