//! The sentiment provider port and the errors the cache surfaces.

use async_trait::async_trait;

use crate::models::CityMoodRecord;

/// Caller-visible failures from the sentiment cache.
#[derive(Debug, thiserror::Error)]
pub enum SentimentError {
    /// The upstream fetch failed (network, parse, whatever the provider
    /// hit). The cache keeps its last-known-good data.
    #[error("sentiment provider failed: {0:#}")]
    Provider(anyhow::Error),
    /// The provider responded but the requested city was not in the set.
    #[error("no sentiment data for city '{0}'")]
    NotFound(String),
}

/// Source of per-city sentiment snapshots. Implemented by the network
/// client in the app and by `MockSentimentProvider` in tests.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Fetch the full city set. The cache treats the returned list as a
    /// complete snapshot and overwrites its entries from it.
    async fn fetch_all_cities(&self) -> anyhow::Result<Vec<CityMoodRecord>>;
}
