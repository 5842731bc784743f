//! Admin CRUD over reference data plus fleet-wide booking and baggage
//! management. Every route here sits behind the admin auth middleware.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use skyway_domain::airplane::{Airplane, AirplaneInput};
use skyway_domain::airport::{Airport, AirportInput};
use skyway_domain::baggage::{Baggage, BaggageInput, BaggageStatus};
use skyway_domain::booking::Booking;
use skyway_domain::flight::{Flight, FlightInput, FlightStatus};
use skyway_domain::seat::{Seat, SeatClass, SeatInput};
use skyway_domain::validation;

use crate::error::AppError;
use crate::response::{created, ok, paginated, ApiResponse, PageQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct StatusUpdate {
    status: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flights", post(create_flight))
        .route("/flights/{id}", axum::routing::put(update_flight).delete(delete_flight))
        .route("/flights/{id}/status", patch(update_flight_status))
        .route("/airplanes", get(list_airplanes).post(create_airplane))
        .route(
            "/airplanes/{id}",
            get(get_airplane).put(update_airplane).delete(delete_airplane),
        )
        .route("/airplanes/{id}/seats", get(list_airplane_seats))
        .route("/seats", post(create_seat))
        .route("/seats/{id}", axum::routing::put(update_seat).delete(delete_seat))
        .route("/airports", get(list_airports).post(create_airport))
        .route(
            "/airports/{id}",
            get(get_airport).put(update_airport).delete(delete_airport),
        )
        .route("/bookings", get(list_all_bookings))
        .route("/baggage", post(create_baggage))
        .route("/baggage/{id}/status", patch(update_baggage_status))
}

fn validated<T>(errors: Vec<String>, value: T) -> Result<T, AppError> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(AppError::Validation(errors))
    }
}

// ---------------------------------------------------------------------------
// Flights
// ---------------------------------------------------------------------------

async fn create_flight(
    State(state): State<AppState>,
    Json(req): Json<FlightInput>,
) -> Result<(StatusCode, Json<ApiResponse<Flight>>), AppError> {
    let req = validated(validation::validate_flight(&req), req)?;
    let flight = state.flights().create(&req).await?;
    tracing::info!(flight_id = flight.id, "flight created");
    Ok(created(flight, "flight created"))
}

async fn update_flight(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<FlightInput>,
) -> Result<Json<ApiResponse<Flight>>, AppError> {
    let req = validated(validation::validate_flight(&req), req)?;
    let flight = state.flights().update(id, &req).await?;
    Ok(ok(flight, "flight updated"))
}

async fn update_flight_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<StatusUpdate>,
) -> Result<Json<ApiResponse<Flight>>, AppError> {
    let status = FlightStatus::parse(&req.status)
        .map_err(|e| AppError::Validation(vec![e.to_string()]))?;
    let flight = state.flights().update_status(id, status).await?;
    Ok(ok(flight, "flight status updated"))
}

async fn delete_flight(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.flights().delete(id).await?;
    Ok(crate::response::ok((), "flight deleted"))
}

// ---------------------------------------------------------------------------
// Airplanes
// ---------------------------------------------------------------------------

async fn list_airplanes(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Airplane>>>, AppError> {
    Ok(ok(state.airplanes().list().await?, "airplanes"))
}

async fn get_airplane(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Airplane>>, AppError> {
    Ok(ok(state.airplanes().find(id).await?, "airplane"))
}

async fn create_airplane(
    State(state): State<AppState>,
    Json(req): Json<AirplaneInput>,
) -> Result<(StatusCode, Json<ApiResponse<Airplane>>), AppError> {
    let req = validated(validation::validate_airplane(&req), req)?;
    let airplane = state.airplanes().create(&req).await?;
    Ok(created(airplane, "airplane created"))
}

async fn update_airplane(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AirplaneInput>,
) -> Result<Json<ApiResponse<Airplane>>, AppError> {
    let req = validated(validation::validate_airplane(&req), req)?;
    let airplane = state.airplanes().update(id, &req).await?;
    Ok(ok(airplane, "airplane updated"))
}

async fn delete_airplane(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.airplanes().delete(id).await?;
    Ok(ok((), "airplane deleted"))
}

async fn list_airplane_seats(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Seat>>>, AppError> {
    state.airplanes().find(id).await?;
    Ok(ok(state.seats().list_by_airplane(id).await?, "seats"))
}

// ---------------------------------------------------------------------------
// Seats
// ---------------------------------------------------------------------------

async fn create_seat(
    State(state): State<AppState>,
    Json(req): Json<SeatInput>,
) -> Result<(StatusCode, Json<ApiResponse<Seat>>), AppError> {
    let req = validated(validation::validate_seat(&req), req)?;
    let class = SeatClass::parse(&req.class)?;
    let seat = state.seats().create(&req, class).await?;
    Ok(created(seat, "seat created"))
}

async fn update_seat(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SeatInput>,
) -> Result<Json<ApiResponse<Seat>>, AppError> {
    let req = validated(validation::validate_seat(&req), req)?;
    let class = SeatClass::parse(&req.class)?;
    let seat = state.seats().update(id, &req, class).await?;
    Ok(ok(seat, "seat updated"))
}

async fn delete_seat(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.seats().delete(id).await?;
    Ok(ok((), "seat deleted"))
}

// ---------------------------------------------------------------------------
// Airports
// ---------------------------------------------------------------------------

async fn list_airports(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Airport>>>, AppError> {
    Ok(ok(state.airports().list().await?, "airports"))
}

async fn get_airport(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Airport>>, AppError> {
    Ok(ok(state.airports().find(id).await?, "airport"))
}

async fn create_airport(
    State(state): State<AppState>,
    Json(req): Json<AirportInput>,
) -> Result<(StatusCode, Json<ApiResponse<Airport>>), AppError> {
    let req = validated(validation::validate_airport(&req), req)?;
    let airport = state.airports().create(&req).await?;
    Ok(created(airport, "airport created"))
}

async fn update_airport(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AirportInput>,
) -> Result<Json<ApiResponse<Airport>>, AppError> {
    let req = validated(validation::validate_airport(&req), req)?;
    let airport = state.airports().update(id, &req).await?;
    Ok(ok(airport, "airport updated"))
}

async fn delete_airport(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.airports().delete(id).await?;
    Ok(ok((), "airport deleted"))
}

// ---------------------------------------------------------------------------
// Bookings & baggage
// ---------------------------------------------------------------------------

async fn list_all_bookings(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Booking>>>, AppError> {
    let page = query.to_page();
    let (bookings, total) = state.bookings().list_all(page).await?;
    Ok(paginated(bookings, page, total, "bookings"))
}

async fn create_baggage(
    State(state): State<AppState>,
    Json(req): Json<BaggageInput>,
) -> Result<(StatusCode, Json<ApiResponse<Baggage>>), AppError> {
    if req.weight_kg <= 0.0 {
        return Err(AppError::Validation(vec![
            "weight_kg must be positive".to_string(),
        ]));
    }

    let tag = format!("SW{}", Uuid::new_v4().simple());
    let baggage = state.baggage().create(&req, &tag).await?;
    Ok(created(baggage, "baggage checked in"))
}

async fn update_baggage_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<StatusUpdate>,
) -> Result<Json<ApiResponse<Baggage>>, AppError> {
    let status = BaggageStatus::parse(&req.status)
        .map_err(|e| AppError::Validation(vec![e.to_string()]))?;
    let baggage = state.baggage().update_status(id, status).await?;
    Ok(ok(baggage, "baggage status updated"))
}
