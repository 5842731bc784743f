use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airplane {
    pub id: i64,
    pub model: String,
    pub manufacturer: String,
    pub capacity: i32,
}

#[derive(Debug, Deserialize)]
pub struct AirplaneInput {
    pub model: String,
    pub manufacturer: String,
    pub capacity: i32,
}
