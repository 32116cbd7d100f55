//! TTL-bounded cache over a sentiment provider.
//!
//! Expiry is checked lazily on access; there is no sweeper. Concurrent
//! callers racing through a cache miss may each trigger a provider fetch;
//! that is an accepted inefficiency, not a bug (last write wins, entries
//! stay coherent because each operation completes before returning).

use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};

use crate::clock::Clock;
use crate::events::{ChangeEvent, ChangeHub};
use crate::models::CityMoodRecord;
use crate::sentiment::provider::{SentimentError, SentimentProvider};

/// How long a fetched record stays fresh.
const CACHE_TTL_SECS: i64 = 300;

struct CachedRecord {
    record: CityMoodRecord,
    stored_at: DateTime<Utc>,
}

pub struct SentimentCache {
    provider: Arc<dyn SentimentProvider>,
    clock: Arc<dyn Clock>,
    entries: HashMap<String, CachedRecord>,
    last_bulk_fetch: Option<DateTime<Utc>>,
    hub: ChangeHub,
}

impl SentimentCache {
    pub fn new(provider: Arc<dyn SentimentProvider>, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            clock,
            entries: HashMap::new(),
            last_bulk_fetch: None,
            hub: ChangeHub::new(),
        }
    }

    /// Receive a `ChangeEvent::SentimentRefreshed` after each successful
    /// bulk fetch.
    pub fn subscribe(&mut self) -> Receiver<ChangeEvent> {
        self.hub.subscribe()
    }

    fn ttl() -> Duration {
        Duration::seconds(CACHE_TTL_SECS)
    }

    /// All cities, served from cache while the last bulk fetch is fresh.
    ///
    /// A fetch overwrites entries keyed by each returned city but does not
    /// clear the map first: cities absent from the new response keep their
    /// old records until a later bulk fetch replaces them.
    pub async fn get_all(&mut self) -> Result<Vec<CityMoodRecord>, SentimentError> {
        let now = self.clock.now();

        if let Some(last_fetch) = self.last_bulk_fetch {
            if now - last_fetch < Self::ttl() && !self.entries.is_empty() {
                return Ok(self
                    .entries
                    .values()
                    .map(|cached| cached.record.clone())
                    .collect());
            }
        }

        let fetched = self.provider.fetch_all_cities().await.map_err(|err| {
            warn!("sentiment fetch failed, keeping last-known-good data: {err:#}");
            SentimentError::Provider(err)
        })?;

        let now = self.clock.now();
        for record in &fetched {
            self.entries.insert(
                record.city_key(),
                CachedRecord {
                    record: record.clone(),
                    stored_at: now,
                },
            );
        }
        self.last_bulk_fetch = Some(now);

        info!("sentiment cache refreshed with {} cities", fetched.len());
        self.hub.emit(ChangeEvent::SentimentRefreshed {
            cities: fetched.iter().map(|r| r.city.clone()).collect(),
        });

        Ok(fetched)
    }

    /// One city, case-insensitively. Served from a fresh per-city entry if
    /// one exists, otherwise via a bulk fetch.
    pub async fn get_one(&mut self, city: &str) -> Result<CityMoodRecord, SentimentError> {
        let key = city.to_lowercase();
        let now = self.clock.now();

        if let Some(cached) = self.entries.get(&key) {
            if now - cached.stored_at < Self::ttl() {
                return Ok(cached.record.clone());
            }
        }

        let all = self.get_all().await?;
        all.into_iter()
            .find(|record| record.city_key() == key)
            .ok_or_else(|| SentimentError::NotFound(city.to_string()))
    }

    /// Drop the bulk-fetch timestamp and fetch again. Always hits the
    /// provider.
    pub async fn force_refresh(&mut self) -> Result<Vec<CityMoodRecord>, SentimentError> {
        self.last_bulk_fetch = None;
        self.get_all().await
    }

    /// City names currently held, fresh or stale. For display fallbacks.
    pub fn cached_cities(&self) -> Vec<String> {
        self.entries
            .values()
            .map(|cached| cached.record.city.clone())
            .collect()
    }
}
