use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};

use skyway_domain::baggage::Baggage;

use crate::error::AppError;
use crate::middleware::auth::AuthClient;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/baggage/booking/{booking_id}", get(list_for_booking))
}

async fn list_for_booking(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthClient>,
    Path(booking_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Baggage>>>, AppError> {
    let booking = state.bookings().find(booking_id).await?;
    if booking.client_id != auth.id && !auth.is_admin() {
        return Err(AppError::NotFound("booking not found".to_string()));
    }

    let baggage = state.baggage().list_by_booking(booking_id).await?;
    Ok(ok(baggage, "baggage"))
}
