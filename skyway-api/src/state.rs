use std::sync::Arc;

use skyway_shared::crypto::SecretVault;
use skyway_store::airplane_repo::AirplaneRepository;
use skyway_store::airport_repo::AirportRepository;
use skyway_store::baggage_repo::BaggageRepository;
use skyway_store::booking_repo::BookingRepository;
use skyway_store::client_repo::ClientRepository;
use skyway_store::flight_repo::FlightRepository;
use skyway_store::payment_repo::PaymentRepository;
use skyway_store::seat_repo::SeatRepository;
use skyway_store::DbClient;

use crate::middleware::rate_limit::RateLimiter;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub db: DbClient,
    pub vault: Arc<SecretVault>,
    pub auth: AuthConfig,
    pub currency: String,
    pub limiter: Arc<RateLimiter>,
}

// Repositories are cheap handles over the shared pool; handlers grab them
// on demand instead of the state carrying nine fields.
impl AppState {
    pub fn clients(&self) -> ClientRepository {
        ClientRepository::new(self.db.pool.clone())
    }

    pub fn airports(&self) -> AirportRepository {
        AirportRepository::new(self.db.pool.clone())
    }

    pub fn airplanes(&self) -> AirplaneRepository {
        AirplaneRepository::new(self.db.pool.clone())
    }

    pub fn seats(&self) -> SeatRepository {
        SeatRepository::new(self.db.pool.clone())
    }

    pub fn flights(&self) -> FlightRepository {
        FlightRepository::new(self.db.pool.clone())
    }

    pub fn bookings(&self) -> BookingRepository {
        BookingRepository::new(self.db.pool.clone())
    }

    pub fn payments(&self) -> PaymentRepository {
        PaymentRepository::new(self.db.pool.clone())
    }

    pub fn baggage(&self) -> BaggageRepository {
        BaggageRepository::new(self.db.pool.clone())
    }
}
