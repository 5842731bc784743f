//! Booking mutation rules, recomputed against wall-clock time on every
//! request. There is no background job flipping bookings read-only.

use chrono::{DateTime, Duration, Utc};

use crate::booking::BookingStatus;
use crate::{DomainError, DomainResult};

/// Departures closer than this are frozen for clients.
pub const MODIFICATION_CUTOFF_HOURS: i64 = 24;

pub fn ensure_modifiable(
    status: BookingStatus,
    departure: DateTime<Utc>,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    if status.is_terminal() {
        return Err(DomainError::RuleViolation(format!(
            "booking is {} and can no longer be changed",
            status.as_str()
        )));
    }
    if departure - now <= Duration::hours(MODIFICATION_CUTOFF_HOURS) {
        return Err(DomainError::RuleViolation(
            "departure is within 24 hours; booking is locked".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hours_from_now: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now + Duration::hours(hours_from_now), now)
    }

    #[test]
    fn allows_pending_booking_outside_cutoff() {
        let (departure, now) = at(48);
        assert!(ensure_modifiable(BookingStatus::Pending, departure, now).is_ok());
        assert!(ensure_modifiable(BookingStatus::Confirmed, departure, now).is_ok());
    }

    #[test]
    fn rejects_within_cutoff() {
        let (departure, now) = at(23);
        assert!(ensure_modifiable(BookingStatus::Pending, departure, now).is_err());
    }

    #[test]
    fn rejects_exactly_at_cutoff() {
        let now = Utc::now();
        let departure = now + Duration::hours(MODIFICATION_CUTOFF_HOURS);
        assert!(ensure_modifiable(BookingStatus::Pending, departure, now).is_err());
    }

    #[test]
    fn rejects_departed_flight() {
        let (departure, now) = at(-2);
        assert!(ensure_modifiable(BookingStatus::Confirmed, departure, now).is_err());
    }

    #[test]
    fn rejects_terminal_statuses_regardless_of_time() {
        let (departure, now) = at(100);
        assert!(ensure_modifiable(BookingStatus::Cancelled, departure, now).is_err());
        assert!(ensure_modifiable(BookingStatus::Completed, departure, now).is_err());
    }
}
