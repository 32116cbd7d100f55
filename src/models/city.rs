//! Per-city sentiment data as delivered by a sentiment provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single mood observation on a city's timeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodSample {
    pub timestamp: DateTime<Utc>,
    /// Normalized mood score in [0, 1].
    pub score: f64,
}

/// A topic influencing a city's mood.
///
/// `impact` is centered on 0.5: above means the theme lifts the mood, below
/// means it drags it down, and the deviation is the magnitude.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub name: String,
    pub description: String,
    pub impact: f64,
}

/// Full sentiment snapshot for one city.
///
/// `timeline` arrives in whatever order the provider produced it; consumers
/// must not assume it is sorted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityMoodRecord {
    pub city: String,
    pub current_score: f64,
    pub as_of: DateTime<Utc>,
    pub themes: Vec<Theme>,
    pub timeline: Vec<MoodSample>,
}

impl CityMoodRecord {
    /// Canonical cache key for this record's city.
    pub fn city_key(&self) -> String {
        self.city.to_lowercase()
    }
}
