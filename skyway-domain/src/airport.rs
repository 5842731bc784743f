use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airport {
    pub id: i64,
    pub iata_code: String,
    pub name: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct AirportInput {
    pub iata_code: String,
    pub name: String,
    pub city: String,
    pub country: String,
}
