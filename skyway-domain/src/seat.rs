use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Cabin class. Older exports used free-form labels ("First Class",
/// "premium economy"), so parsing normalizes before matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatClass {
    First,
    Business,
    PremiumEconomy,
    Economy,
}

impl SeatClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatClass::First => "first",
            SeatClass::Business => "business",
            SeatClass::PremiumEconomy => "premium_economy",
            SeatClass::Economy => "economy",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let normalized = value
            .trim()
            .to_ascii_lowercase()
            .replace(['-', ' '], "_");
        match normalized.as_str() {
            "first" | "first_class" => Ok(SeatClass::First),
            "business" | "business_class" => Ok(SeatClass::Business),
            "premium_economy" | "premium" => Ok(SeatClass::PremiumEconomy),
            "economy" | "economy_class" | "coach" => Ok(SeatClass::Economy),
            _ => Err(DomainError::UnknownVariant {
                kind: "seat class",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub id: i64,
    pub airplane_id: i64,
    pub seat_number: String,
    pub class: SeatClass,
    pub price_amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct SeatInput {
    pub airplane_id: i64,
    pub seat_number: String,
    pub class: String,
    pub price_amount: i64,
}

/// A seat joined against live passenger rows for one flight.
#[derive(Debug, Clone, Serialize)]
pub struct SeatAvailability {
    #[serde(flatten)]
    pub seat: Seat,
    pub occupied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_classes() {
        assert_eq!(SeatClass::parse("first").unwrap(), SeatClass::First);
        assert_eq!(SeatClass::parse("business").unwrap(), SeatClass::Business);
        assert_eq!(
            SeatClass::parse("premium_economy").unwrap(),
            SeatClass::PremiumEconomy
        );
        assert_eq!(SeatClass::parse("economy").unwrap(), SeatClass::Economy);
    }

    #[test]
    fn parses_legacy_labels() {
        assert_eq!(SeatClass::parse("First Class").unwrap(), SeatClass::First);
        assert_eq!(
            SeatClass::parse("Premium-Economy").unwrap(),
            SeatClass::PremiumEconomy
        );
        assert_eq!(
            SeatClass::parse("premium economy").unwrap(),
            SeatClass::PremiumEconomy
        );
        assert_eq!(SeatClass::parse(" ECONOMY ").unwrap(), SeatClass::Economy);
    }

    #[test]
    fn rejects_unknown_class() {
        assert!(SeatClass::parse("cargo").is_err());
    }
}
