//! Location fixes, persisted visit records, and map viewport geometry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A raw position sample from a location provider. Unvalidated input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationFix {
    pub lat: f64,
    pub lon: f64,
    pub timestamp: DateTime<Utc>,
}

/// A visit that passed the significance thresholds and was persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub id: Uuid,
    pub lat: f64,
    pub lon: f64,
    pub timestamp: DateTime<Utc>,
    pub city: String,
    pub locality: String,
}

impl LocationRecord {
    pub fn from_fix(fix: &LocationFix, city: &str, locality: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            lat: fix.lat,
            lon: fix.lon,
            timestamp: fix.timestamp,
            city: city.to_string(),
            locality: locality.to_string(),
        }
    }
}

/// A latitude/longitude point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// A map viewport: center point plus the visible span on each axis, in
/// degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub center: Coordinate,
    pub lat_span: f64,
    pub lon_span: f64,
}
