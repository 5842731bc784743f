//! Declarative-ish request validation, run before any handler touches the
//! database. Each function collects every problem instead of bailing on the
//! first, so clients get one complete report.

use chrono::Utc;

use crate::airplane::AirplaneInput;
use crate::airport::AirportInput;
use crate::booking::{CreateBookingRequest, Gender};
use crate::client::RegisterRequest;
use crate::flight::FlightInput;
use crate::seat::{SeatClass, SeatInput};

pub const MAX_PASSENGERS_PER_BOOKING: usize = 10;

pub fn validate_booking(req: &CreateBookingRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if req.flight_id <= 0 {
        errors.push("flight_id must be positive".to_string());
    }
    if req.passengers.is_empty() {
        errors.push("at least one passenger is required".to_string());
    }
    if req.passengers.len() > MAX_PASSENGERS_PER_BOOKING {
        errors.push(format!(
            "at most {} passengers per booking",
            MAX_PASSENGERS_PER_BOOKING
        ));
    }

    let today = Utc::now().date_naive();
    for (i, p) in req.passengers.iter().enumerate() {
        let field = |name: &str| format!("passengers[{}].{}", i, name);
        if p.first_name.trim().is_empty() {
            errors.push(format!("{} must not be blank", field("first_name")));
        }
        if p.last_name.trim().is_empty() {
            errors.push(format!("{} must not be blank", field("last_name")));
        }
        if p.passport_number.0.trim().is_empty() {
            errors.push(format!("{} must not be blank", field("passport_number")));
        }
        if p.nationality.trim().is_empty() {
            errors.push(format!("{} must not be blank", field("nationality")));
        }
        if Gender::parse(&p.gender).is_err() {
            errors.push(format!(
                "{} must be one of male, female, other",
                field("gender")
            ));
        }
        if p.date_of_birth >= today {
            errors.push(format!("{} must be in the past", field("date_of_birth")));
        }
        if p.seat_id <= 0 {
            errors.push(format!("{} must be positive", field("seat_id")));
        }
    }

    errors
}

pub fn validate_registration(req: &RegisterRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if req.username.trim().len() < 3 {
        errors.push("username must be at least 3 characters".to_string());
    }
    if !looks_like_email(&req.email) {
        errors.push("email is not valid".to_string());
    }
    if req.password.len() < 8 {
        errors.push("password must be at least 8 characters".to_string());
    }
    if req.first_name.trim().is_empty() {
        errors.push("first_name must not be blank".to_string());
    }
    if req.last_name.trim().is_empty() {
        errors.push("last_name must not be blank".to_string());
    }
    errors
}

pub fn validate_airport(req: &AirportInput) -> Vec<String> {
    let mut errors = Vec::new();
    let code = req.iata_code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        errors.push("iata_code must be exactly 3 letters".to_string());
    }
    if req.name.trim().is_empty() {
        errors.push("name must not be blank".to_string());
    }
    if req.city.trim().is_empty() {
        errors.push("city must not be blank".to_string());
    }
    if req.country.trim().is_empty() {
        errors.push("country must not be blank".to_string());
    }
    errors
}

pub fn validate_airplane(req: &AirplaneInput) -> Vec<String> {
    let mut errors = Vec::new();
    if req.model.trim().is_empty() {
        errors.push("model must not be blank".to_string());
    }
    if req.manufacturer.trim().is_empty() {
        errors.push("manufacturer must not be blank".to_string());
    }
    if req.capacity <= 0 {
        errors.push("capacity must be positive".to_string());
    }
    errors
}

pub fn validate_seat(req: &SeatInput) -> Vec<String> {
    let mut errors = Vec::new();
    if req.airplane_id <= 0 {
        errors.push("airplane_id must be positive".to_string());
    }
    if req.seat_number.trim().is_empty() {
        errors.push("seat_number must not be blank".to_string());
    }
    if SeatClass::parse(&req.class).is_err() {
        errors.push("class is not a known seat class".to_string());
    }
    if req.price_amount < 0 {
        errors.push("price_amount must not be negative".to_string());
    }
    errors
}

pub fn validate_flight(req: &FlightInput) -> Vec<String> {
    let mut errors = Vec::new();
    if req.flight_number.trim().is_empty() {
        errors.push("flight_number must not be blank".to_string());
    }
    if req.airplane_id <= 0 {
        errors.push("airplane_id must be positive".to_string());
    }
    if req.origin_airport_id <= 0 {
        errors.push("origin_airport_id must be positive".to_string());
    }
    if req.destination_airport_id <= 0 {
        errors.push("destination_airport_id must be positive".to_string());
    }
    if req.origin_airport_id == req.destination_airport_id {
        errors.push("origin and destination must differ".to_string());
    }
    if req.arrival_time <= req.departure_time {
        errors.push("arrival_time must be after departure_time".to_string());
    }
    errors
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::PassengerInput;
    use chrono::NaiveDate;

    fn passenger(seat_id: i64) -> PassengerInput {
        PassengerInput {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            passport_number: skyway_shared::pii::Masked("P1234567".to_string()),
            nationality: "GB".to_string(),
            gender: "female".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            seat_id,
        }
    }

    fn booking(passengers: Vec<PassengerInput>) -> CreateBookingRequest {
        CreateBookingRequest {
            flight_id: 1,
            passengers,
            priority_support: false,
            fast_track: false,
        }
    }

    #[test]
    fn valid_booking_passes() {
        assert!(validate_booking(&booking(vec![passenger(1)])).is_empty());
    }

    #[test]
    fn rejects_nonpositive_flight_id() {
        let mut req = booking(vec![passenger(1)]);
        req.flight_id = 0;
        assert!(!validate_booking(&req).is_empty());
    }

    #[test]
    fn rejects_empty_passenger_list() {
        let errors = validate_booking(&booking(vec![]));
        assert_eq!(errors, vec!["at least one passenger is required"]);
    }

    #[test]
    fn rejects_too_many_passengers() {
        let req = booking((0..11).map(|i| passenger(i + 1)).collect());
        assert!(!validate_booking(&req).is_empty());
    }

    #[test]
    fn collects_all_passenger_problems() {
        let mut p = passenger(0);
        p.first_name = "  ".to_string();
        p.gender = "unknown".to_string();
        let errors = validate_booking(&booking(vec![p]));
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("first_name")));
        assert!(errors.iter().any(|e| e.contains("gender")));
        assert!(errors.iter().any(|e| e.contains("seat_id")));
    }

    #[test]
    fn rejects_future_date_of_birth() {
        let mut p = passenger(1);
        p.date_of_birth = Utc::now().date_naive() + chrono::Duration::days(1);
        assert!(!validate_booking(&booking(vec![p])).is_empty());
    }

    #[test]
    fn registration_checks_email_and_password() {
        let req = RegisterRequest {
            username: "jo".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            first_name: "Jo".to_string(),
            last_name: "Smith".to_string(),
        };
        let errors = validate_registration(&req);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn airport_code_must_be_three_letters() {
        let req = AirportInput {
            iata_code: "LHRX".to_string(),
            name: "Heathrow".to_string(),
            city: "London".to_string(),
            country: "UK".to_string(),
        };
        assert!(!validate_airport(&req).is_empty());
    }

    #[test]
    fn flight_requires_distinct_endpoints_and_ordered_times() {
        let now = Utc::now();
        let req = FlightInput {
            flight_number: "SW100".to_string(),
            airplane_id: 1,
            origin_airport_id: 2,
            destination_airport_id: 2,
            departure_time: now,
            arrival_time: now,
        };
        let errors = validate_flight(&req);
        assert_eq!(errors.len(), 2);
    }
}
