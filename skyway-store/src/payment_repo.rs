use sqlx::PgPool;

use skyway_domain::booking::BookingStatus;
use skyway_domain::payment::{Payment, PaymentStatus};

use crate::booking_repo::BookingRepository;
use crate::StoreResult;

pub struct PaymentRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: i64,
    booking_id: i64,
    amount: i64,
    currency: String,
    status: String,
    reference: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl PaymentRow {
    fn into_payment(self) -> StoreResult<Payment> {
        Ok(Payment {
            id: self.id,
            booking_id: self.booking_id,
            amount: self.amount,
            currency: self.currency,
            status: PaymentStatus::parse(&self.status)?,
            reference: self.reference,
            created_at: self.created_at,
        })
    }
}

const PAYMENT_COLUMNS: &str = "id, booking_id, amount, currency, status, reference, created_at";

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the payment row and confirms the booking in one transaction.
    pub async fn record_payment(
        &self,
        booking_id: i64,
        amount: i64,
        currency: &str,
        reference: &str,
    ) -> StoreResult<Payment> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            INSERT INTO payments (booking_id, amount, currency, status, reference)
            VALUES ($1, $2, $3, 'completed', $4)
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(booking_id)
        .bind(amount)
        .bind(currency)
        .bind(reference)
        .fetch_one(&mut *tx)
        .await?;

        BookingRepository::transition_status_tx(
            &mut tx,
            booking_id,
            BookingStatus::Pending,
            BookingStatus::Confirmed,
        )
        .await?;

        tx.commit().await?;
        row.into_payment()
    }

    /// A refund is a new negative-amount row; the original payment row is
    /// never mutated. The booking flips to cancelled in the same transaction.
    /// Seat availability is not restored here; it is always re-derived from
    /// passenger/booking joins.
    pub async fn record_refund(
        &self,
        booking_id: i64,
        amount: i64,
        currency: &str,
        reference: &str,
    ) -> StoreResult<Payment> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            INSERT INTO payments (booking_id, amount, currency, status, reference)
            VALUES ($1, $2, $3, 'refunded', $4)
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(booking_id)
        .bind(-amount.abs())
        .bind(currency)
        .bind(reference)
        .fetch_one(&mut *tx)
        .await?;

        BookingRepository::transition_status_tx(
            &mut tx,
            booking_id,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
        )
        .await?;

        tx.commit().await?;
        row.into_payment()
    }

    pub async fn list_by_booking(&self, booking_id: i64) -> StoreResult<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {} FROM payments WHERE booking_id = $1 ORDER BY created_at",
            PAYMENT_COLUMNS
        ))
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PaymentRow::into_payment).collect()
    }
}
