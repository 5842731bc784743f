use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::airport::Airport;
use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    Scheduled,
    Delayed,
    Cancelled,
    Boarding,
    Departed,
    Arrived,
}

impl FlightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "scheduled",
            FlightStatus::Delayed => "delayed",
            FlightStatus::Cancelled => "cancelled",
            FlightStatus::Boarding => "boarding",
            FlightStatus::Departed => "departed",
            FlightStatus::Arrived => "arrived",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "scheduled" => Ok(FlightStatus::Scheduled),
            "delayed" => Ok(FlightStatus::Delayed),
            "cancelled" => Ok(FlightStatus::Cancelled),
            "boarding" => Ok(FlightStatus::Boarding),
            "departed" => Ok(FlightStatus::Departed),
            "arrived" => Ok(FlightStatus::Arrived),
            other => Err(DomainError::UnknownVariant {
                kind: "flight status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Flight {
    pub id: i64,
    pub flight_number: String,
    pub airplane_id: i64,
    pub origin_airport_id: i64,
    pub destination_airport_id: i64,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub status: FlightStatus,
}

/// Detail view with reference data joined in.
#[derive(Debug, Clone, Serialize)]
pub struct FlightDetail {
    #[serde(flatten)]
    pub flight: Flight,
    pub origin: Airport,
    pub destination: Airport,
    pub airplane_model: String,
    pub airplane_capacity: i32,
}

#[derive(Debug, Deserialize)]
pub struct FlightInput {
    pub flight_number: String,
    pub airplane_id: i64,
    pub origin_airport_id: i64,
    pub destination_airport_id: i64,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FlightSearch {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<chrono::NaiveDate>,
    pub status: Option<String>,
}
