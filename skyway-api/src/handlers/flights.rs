use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use skyway_domain::flight::{Flight, FlightDetail, FlightSearch};
use skyway_domain::seat::SeatAvailability;

use crate::error::AppError;
use crate::response::{ok, paginated, ApiResponse, PageQuery};
use crate::state::AppState;

// Search filters and paging in one flat struct; serde_urlencoded cannot
// deserialize numbers through #[serde(flatten)].
#[derive(Debug, Deserialize)]
struct FlightListQuery {
    origin: Option<String>,
    destination: Option<String>,
    date: Option<chrono::NaiveDate>,
    status: Option<String>,
    page: Option<i64>,
    per_page: Option<i64>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/flights", get(list_flights))
        .route("/api/flights/{id}", get(get_flight))
        .route("/api/flights/{id}/seats", get(flight_seats))
}

async fn list_flights(
    State(state): State<AppState>,
    Query(query): Query<FlightListQuery>,
) -> Result<Json<ApiResponse<Vec<Flight>>>, AppError> {
    let search = FlightSearch {
        origin: query.origin,
        destination: query.destination,
        date: query.date,
        status: query.status,
    };
    let page = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .to_page();
    let (flights, total) = state.flights().search(&search, page).await?;
    Ok(paginated(flights, page, total, "flights"))
}

async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<FlightDetail>>, AppError> {
    let detail = state.flights().find_detail(id).await?;
    Ok(ok(detail, "flight"))
}

async fn flight_seats(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<SeatAvailability>>>, AppError> {
    // 404 rather than an empty list for unknown flights
    state.flights().find(id).await?;
    let seats = state.seats().list_for_flight(id).await?;
    Ok(ok(seats, "seats"))
}
