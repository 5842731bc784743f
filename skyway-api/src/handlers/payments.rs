use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use skyway_domain::booking::BookingStatus;
use skyway_domain::payment::{CreatePaymentRequest, Payment};

use crate::error::AppError;
use crate::middleware::auth::AuthClient;
use crate::response::{created, ok, ApiResponse};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/payments", post(create_payment))
        .route("/api/payments/refund/{booking_id}", post(refund))
        .route("/api/payments/booking/{booking_id}", get(list_for_booking))
}

async fn owned_booking(
    state: &AppState,
    auth: &AuthClient,
    booking_id: i64,
) -> Result<skyway_domain::booking::Booking, AppError> {
    let booking = state.bookings().find(booking_id).await?;
    if booking.client_id != auth.id && !auth.is_admin() {
        return Err(AppError::NotFound("booking not found".to_string()));
    }
    Ok(booking)
}

async fn create_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthClient>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Payment>>), AppError> {
    if req.payment_token.trim().is_empty() {
        return Err(AppError::Payment("payment token is required".to_string()));
    }

    let booking = owned_booking(&state, &auth, req.booking_id).await?;
    match booking.status {
        BookingStatus::Pending => {}
        BookingStatus::Confirmed | BookingStatus::Completed => {
            return Err(AppError::Conflict("booking is already paid".to_string()));
        }
        BookingStatus::Cancelled => {
            return Err(AppError::Conflict(
                "cancelled bookings cannot be paid".to_string(),
            ));
        }
    }

    let reference = format!("pay_{}", Uuid::new_v4().simple());
    let payment = state
        .payments()
        .record_payment(
            booking.id,
            booking.total_amount,
            &booking.currency,
            &reference,
        )
        .await?;

    tracing::info!(
        booking_id = booking.id,
        amount = payment.amount,
        "payment recorded, booking confirmed"
    );

    Ok(created(payment, "payment completed"))
}

async fn refund(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthClient>,
    Path(booking_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<Payment>>), AppError> {
    let booking = owned_booking(&state, &auth, booking_id).await?;
    if booking.status != BookingStatus::Confirmed {
        return Err(AppError::Conflict(format!(
            "only confirmed bookings can be refunded, booking is {}",
            booking.status.as_str()
        )));
    }

    let reference = format!("ref_{}", Uuid::new_v4().simple());
    let refund = state
        .payments()
        .record_refund(
            booking.id,
            booking.total_amount,
            &booking.currency,
            &reference,
        )
        .await?;

    tracing::info!(booking_id, amount = refund.amount, "refund recorded");
    Ok(created(refund, "refund completed"))
}

async fn list_for_booking(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthClient>,
    Path(booking_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Payment>>>, AppError> {
    owned_booking(&state, &auth, booking_id).await?;
    let payments = state.payments().list_by_booking(booking_id).await?;
    Ok(ok(payments, "payments"))
}
