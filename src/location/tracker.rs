//! Decides which raw position fixes are worth keeping, and summarizes the
//! resulting visit history.
//!
//! A fix is significant when it is the first one seen, or when it moved far
//! enough or enough time passed since the last accepted fix. Accepted fixes
//! become `LocationRecord`s in a bounded history that is flushed to the
//! injected store after every accept and replayed at startup to rebuild the
//! per-city visit counts.

use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::events::{ChangeEvent, ChangeHub};
use crate::location::geo::haversine_distance_m;
use crate::location::store::HistoryStore;
use crate::models::{Coordinate, LocationFix, LocationRecord, Region};

/// Movement below this is not significant on its own.
const SIGNIFICANT_DISTANCE_M: f64 = 200.0;
/// A fix this long after the last accepted one is significant regardless of
/// movement.
const SIGNIFICANT_ELAPSED_SECS: i64 = 600;
/// Oldest records are dropped past this count.
const HISTORY_CAP: usize = 100;
/// How many recent records the viewport considers.
const VIEWPORT_SAMPLE_SIZE: usize = 20;
/// Minimum bounding-box padding per axis, in degrees.
const PADDING_FLOOR_DEG: f64 = 0.02;
const PADDING_RATIO: f64 = 0.3;
/// Viewport fallbacks when the history is empty.
const CURRENT_FIX_SPAN_DEG: f64 = 0.05;
const DEFAULT_SPAN_DEG: f64 = 0.1;
const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 37.7749,
    lon: -122.4194,
};

/// Geocoded city placeholder that must not count as a visit.
const UNKNOWN_CITY: &str = "Unknown";

pub struct LocationSignificanceTracker {
    store: Arc<dyn HistoryStore>,
    last_accepted: Option<LocationFix>,
    history: Vec<LocationRecord>,
    frequency: HashMap<String, u64>,
    /// City names in the order they first appeared; breaks count ties in
    /// `top_places`.
    first_seen: Vec<String>,
    hub: ChangeHub,
}

impl LocationSignificanceTracker {
    /// Restore the tracker from the store. The frequency map is rebuilt by
    /// replaying the loaded history, never loaded separately.
    pub async fn load(store: Arc<dyn HistoryStore>) -> Result<Self> {
        let history = store
            .load()
            .await
            .context("failed to load location history")?;

        let mut tracker = Self {
            store,
            last_accepted: None,
            history: Vec::new(),
            frequency: HashMap::new(),
            first_seen: Vec::new(),
            hub: ChangeHub::new(),
        };
        for record in &history {
            tracker.bump_frequency(&record.city);
        }
        tracker.history = history;

        info!(
            "location tracker restored {} records, {} cities",
            tracker.history.len(),
            tracker.frequency.len()
        );
        Ok(tracker)
    }

    /// Tracker with no persisted past, e.g. first launch.
    pub fn empty(store: Arc<dyn HistoryStore>) -> Self {
        Self {
            store,
            last_accepted: None,
            history: Vec::new(),
            frequency: HashMap::new(),
            first_seen: Vec::new(),
            hub: ChangeHub::new(),
        }
    }

    /// Receive a `ChangeEvent::LocationRecorded` for each accepted fix.
    pub fn subscribe(&mut self) -> Receiver<ChangeEvent> {
        self.hub.subscribe()
    }

    /// Offer a fix. Returns whether it was significant and recorded. The
    /// caller resolves `city`/`locality` via its geocoder beforehand.
    ///
    /// On accept the full history is flushed to the store before returning;
    /// a store failure surfaces as an error with the in-memory state
    /// already updated (the next accept rewrites the whole blob anyway).
    pub async fn ingest(
        &mut self,
        fix: LocationFix,
        city: &str,
        locality: &str,
    ) -> Result<bool> {
        if !self.is_significant(&fix) {
            debug!("dropping insignificant fix at ({}, {})", fix.lat, fix.lon);
            return Ok(false);
        }

        self.last_accepted = Some(fix);
        self.history
            .push(LocationRecord::from_fix(&fix, city, locality));
        while self.history.len() > HISTORY_CAP {
            self.history.remove(0);
        }
        if city != UNKNOWN_CITY {
            self.bump_frequency(city);
        }

        self.store
            .save(&self.history)
            .await
            .context("failed to persist location history")?;

        info!("recorded significant fix in {city}");
        self.hub.emit(ChangeEvent::LocationRecorded {
            city: city.to_string(),
        });

        Ok(true)
    }

    fn is_significant(&self, fix: &LocationFix) -> bool {
        let Some(last) = &self.last_accepted else {
            return true;
        };

        let distance = haversine_distance_m(fix.lat, fix.lon, last.lat, last.lon);
        let elapsed = (fix.timestamp - last.timestamp).num_seconds();
        distance > SIGNIFICANT_DISTANCE_M || elapsed > SIGNIFICANT_ELAPSED_SECS
    }

    fn bump_frequency(&mut self, city: &str) {
        if city == UNKNOWN_CITY {
            return;
        }
        if !self.frequency.contains_key(city) {
            self.first_seen.push(city.to_string());
        }
        *self.frequency.entry(city.to_string()).or_insert(0) += 1;
    }

    /// Most-visited cities, count descending. Equal counts keep
    /// first-seen order.
    pub fn top_places(&self, limit: usize) -> Vec<(String, u64)> {
        let rank_of = |city: &str| {
            self.first_seen
                .iter()
                .position(|seen| seen == city)
                .unwrap_or(usize::MAX)
        };

        let mut places: Vec<(String, u64)> = self
            .frequency
            .iter()
            .map(|(city, count)| (city.clone(), *count))
            .collect();
        places.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| rank_of(&a.0).cmp(&rank_of(&b.0))));
        places.truncate(limit);
        places
    }

    /// Bounding viewport over the most recent visits.
    ///
    /// With no history, falls back to `current` (tight span) or to the
    /// default center (wide span). A single point still gets a non-zero
    /// span through the padding floor.
    pub fn recent_viewport(&self, current: Option<Coordinate>) -> Region {
        let start = self.history.len().saturating_sub(VIEWPORT_SAMPLE_SIZE);
        let recent = &self.history[start..];

        if recent.is_empty() {
            return match current {
                Some(center) => Region {
                    center,
                    lat_span: CURRENT_FIX_SPAN_DEG,
                    lon_span: CURRENT_FIX_SPAN_DEG,
                },
                None => Region {
                    center: DEFAULT_CENTER,
                    lat_span: DEFAULT_SPAN_DEG,
                    lon_span: DEFAULT_SPAN_DEG,
                },
            };
        }

        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lon = f64::MAX;
        let mut max_lon = f64::MIN;
        for record in recent {
            min_lat = min_lat.min(record.lat);
            max_lat = max_lat.max(record.lat);
            min_lon = min_lon.min(record.lon);
            max_lon = max_lon.max(record.lon);
        }

        let lat_padding = PADDING_FLOOR_DEG.max((max_lat - min_lat) * PADDING_RATIO);
        let lon_padding = PADDING_FLOOR_DEG.max((max_lon - min_lon) * PADDING_RATIO);

        Region {
            center: Coordinate {
                lat: (min_lat + max_lat) / 2.0,
                lon: (min_lon + max_lon) / 2.0,
            },
            lat_span: (max_lat - min_lat) + 2.0 * lat_padding,
            lon_span: (max_lon - min_lon) + 2.0 * lon_padding,
        }
    }

    pub fn history(&self) -> &[LocationRecord] {
        &self.history
    }

    pub fn last_accepted(&self) -> Option<&LocationFix> {
        self.last_accepted.as_ref()
    }
}
