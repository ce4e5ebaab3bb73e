//! Decoded input records.
//!
//! Mirrors the city-bikes network document:
//!
//! ```json
//! { "network": { "id": "bikemi", "stations": [
//!     { "id": "b526…", "name": "Duomo", "latitude": 45.46, "longitude": 9.18,
//!       "free_bikes": 2, "empty_slots": 28 } ] } }
//! ```
//!
//! Unknown fields are ignored so full upstream documents decode as-is.

use serde::Deserialize;

/// One station as it appears in the input document.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StationRecord {
    pub id:          String,
    pub name:        String,
    pub latitude:    f64,
    pub longitude:   f64,
    pub free_bikes:  u32,
    pub empty_slots: u32,
}

/// A bike-share network: an id plus its stations.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Network {
    pub id:       String,
    pub stations: Vec<StationRecord>,
}

/// Top-level document wrapper.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct City {
    pub network: Network,
}

impl City {
    /// The city's id is its network's id.
    pub fn id(&self) -> &str {
        &self.network.id
    }
}
