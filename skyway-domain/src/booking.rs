use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use skyway_shared::pii::Masked;

use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(DomainError::UnknownVariant {
                kind: "booking status",
                value: other.to_string(),
            }),
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(DomainError::UnknownVariant {
                kind: "gender",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub id: i64,
    pub client_id: i64,
    pub flight_id: i64,
    pub status: BookingStatus,
    pub priority_support: bool,
    pub fast_track: bool,
    pub total_amount: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PassengerInput {
    pub first_name: String,
    pub last_name: String,
    /// Redacted in Debug output; the real value only flows into the vault.
    pub passport_number: Masked<String>,
    pub nationality: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub seat_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub flight_id: i64,
    pub passengers: Vec<PassengerInput>,
    #[serde(default)]
    pub priority_support: bool,
    #[serde(default)]
    pub fast_track: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub priority_support: Option<bool>,
    pub fast_track: Option<bool>,
}
