use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaggageStatus {
    CheckedIn,
    Loaded,
    InTransit,
    Arrived,
    Claimed,
    Lost,
}

impl BaggageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaggageStatus::CheckedIn => "checked_in",
            BaggageStatus::Loaded => "loaded",
            BaggageStatus::InTransit => "in_transit",
            BaggageStatus::Arrived => "arrived",
            BaggageStatus::Claimed => "claimed",
            BaggageStatus::Lost => "lost",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "checked_in" => Ok(BaggageStatus::CheckedIn),
            "loaded" => Ok(BaggageStatus::Loaded),
            "in_transit" => Ok(BaggageStatus::InTransit),
            "arrived" => Ok(BaggageStatus::Arrived),
            "claimed" => Ok(BaggageStatus::Claimed),
            "lost" => Ok(BaggageStatus::Lost),
            other => Err(DomainError::UnknownVariant {
                kind: "baggage status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Baggage {
    pub id: i64,
    pub booking_id: i64,
    pub passenger_id: i64,
    pub tag_number: String,
    pub weight_kg: f64,
    pub status: BaggageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct BaggageInput {
    pub booking_id: i64,
    pub passenger_id: i64,
    pub weight_kg: f64,
}
