use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use skyway_domain::booking::{
    Booking, BookingStatus, CreateBookingRequest, Gender, UpdateBookingRequest,
};
use skyway_domain::{rules, validation};
use skyway_shared::pii::masked_tail;
use skyway_store::booking_repo::PreparedPassenger;

use crate::error::AppError;
use crate::middleware::auth::AuthClient;
use crate::response::{created, ok, paginated, ApiResponse, PageQuery};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct BookingCreated {
    booking_id: i64,
    status: BookingStatus,
    total_amount: i64,
    currency: String,
}

#[derive(Debug, Serialize)]
struct PassengerView {
    id: i64,
    first_name: String,
    last_name: String,
    /// Decrypted, then redacted to the last three characters.
    passport_number: String,
    nationality: String,
    gender: String,
    date_of_birth: chrono::NaiveDate,
    seat_id: i64,
    seat_number: String,
}

#[derive(Debug, Serialize)]
struct BookingDetail {
    #[serde(flatten)]
    booking: Booking,
    passengers: Vec<PassengerView>,
}

#[derive(Debug, Deserialize)]
struct StatusUpdate {
    status: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", post(create_booking).get(list_bookings))
        .route(
            "/api/bookings/{id}",
            get(get_booking).put(update_booking).delete(cancel_booking),
        )
        .route("/api/bookings/{id}/status", patch(update_status))
}

/// Owner-or-admin access check. Missing bookings and foreign bookings both
/// come back as 404 so ids cannot be probed.
async fn load_accessible(
    state: &AppState,
    auth: &AuthClient,
    id: i64,
) -> Result<Booking, AppError> {
    let booking = state.bookings().find(id).await?;
    if booking.client_id != auth.id && !auth.is_admin() {
        return Err(AppError::NotFound("booking not found".to_string()));
    }
    Ok(booking)
}

async fn ensure_modifiable(state: &AppState, booking: &Booking) -> Result<(), AppError> {
    let flight = state.flights().find(booking.flight_id).await?;
    rules::ensure_modifiable(booking.status, flight.departure_time, Utc::now())?;
    Ok(())
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthClient>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingCreated>>), AppError> {
    let errors = validation::validate_booking(&req);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let mut passengers = Vec::with_capacity(req.passengers.len());
    for p in &req.passengers {
        passengers.push(PreparedPassenger {
            first_name: p.first_name.trim().to_string(),
            last_name: p.last_name.trim().to_string(),
            passport_sealed: state.vault.seal(p.passport_number.0.trim())?,
            nationality: p.nationality.trim().to_string(),
            gender: Gender::parse(&p.gender)?,
            date_of_birth: p.date_of_birth,
            seat_id: p.seat_id,
        });
    }

    let booking = state
        .bookings()
        .create(
            auth.id,
            req.flight_id,
            passengers,
            req.priority_support,
            req.fast_track,
            &state.currency,
        )
        .await?;

    tracing::info!(
        booking_id = booking.id,
        flight_id = booking.flight_id,
        total = booking.total_amount,
        "booking created"
    );

    Ok(created(
        BookingCreated {
            booking_id: booking.id,
            status: booking.status,
            total_amount: booking.total_amount,
            currency: booking.currency,
        },
        "booking created",
    ))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthClient>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Booking>>>, AppError> {
    let page = query.to_page();
    let (bookings, total) = state.bookings().list_by_client(auth.id, page).await?;
    Ok(paginated(bookings, page, total, "bookings"))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthClient>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BookingDetail>>, AppError> {
    let booking = load_accessible(&state, &auth, id).await?;

    let records = state.bookings().passengers_of(id).await?;
    let mut passengers = Vec::with_capacity(records.len());
    for r in records {
        let passport = state.vault.open(&r.passport_sealed)?;
        passengers.push(PassengerView {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            passport_number: masked_tail(&passport, 3),
            nationality: r.nationality,
            gender: r.gender,
            date_of_birth: r.date_of_birth,
            seat_id: r.seat_id,
            seat_number: r.seat_number,
        });
    }

    Ok(ok(BookingDetail { booking, passengers }, "booking"))
}

async fn update_booking(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthClient>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<ApiResponse<Booking>>, AppError> {
    let booking = load_accessible(&state, &auth, id).await?;
    ensure_modifiable(&state, &booking).await?;

    let updated = state
        .bookings()
        .update_flags(
            id,
            req.priority_support.unwrap_or(booking.priority_support),
            req.fast_track.unwrap_or(booking.fast_track),
        )
        .await?;

    Ok(ok(updated, "booking updated"))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthClient>,
    Path(id): Path<i64>,
    Json(req): Json<StatusUpdate>,
) -> Result<Json<ApiResponse<Booking>>, AppError> {
    let status = BookingStatus::parse(&req.status)
        .map_err(|e| AppError::Validation(vec![e.to_string()]))?;

    let booking = load_accessible(&state, &auth, id).await?;

    if auth.is_admin() {
        let updated = state.bookings().update_status(id, status).await?;
        return Ok(ok(updated, "booking status updated"));
    }

    // Clients may only cancel; everything else is a payment or admin flow.
    if status != BookingStatus::Cancelled {
        return Err(AppError::Authorization(
            "clients may only cancel their bookings".to_string(),
        ));
    }
    ensure_modifiable(&state, &booking).await?;

    let updated = state
        .bookings()
        .update_status(id, BookingStatus::Cancelled)
        .await?;
    Ok(ok(updated, "booking cancelled"))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthClient>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Booking>>, AppError> {
    let booking = load_accessible(&state, &auth, id).await?;
    if !auth.is_admin() {
        ensure_modifiable(&state, &booking).await?;
    } else if booking.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "booking is already {}",
            booking.status.as_str()
        )));
    }

    // Cancellation flips status only; passenger and payment rows stay.
    let updated = state
        .bookings()
        .update_status(id, BookingStatus::Cancelled)
        .await?;

    tracing::info!(booking_id = id, "booking cancelled");
    Ok(ok(updated, "booking cancelled"))
}
