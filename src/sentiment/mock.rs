//! Deterministic sentiment fixture.
//!
//! Test/preview data only; the production app points the cache at a real
//! network provider. Jitter comes from an `StdRng` seeded by the city name,
//! so a given city always gets the same timeline for a given base time.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{CityMoodRecord, MoodSample, Theme};
use crate::sentiment::provider::SentimentProvider;

/// Hourly score cycle the synthetic timeline repeats, newest first.
const SCORE_CYCLE: [f64; 6] = [0.8, 0.6, 0.5, 0.4, 0.3, 0.7];
const TIMELINE_HOURS: usize = 24;

#[derive(Debug, Clone)]
pub struct MockSentimentProvider {
    base_time: DateTime<Utc>,
    cities: Vec<(String, f64)>,
}

impl MockSentimentProvider {
    /// The default three-city fixture.
    pub fn new(base_time: DateTime<Utc>) -> Self {
        Self {
            base_time,
            cities: vec![
                ("San Francisco".to_string(), 0.8),
                ("New York".to_string(), 0.4),
                ("Chicago".to_string(), 0.6),
            ],
        }
    }

    /// Fixture with a custom city set, e.g. for cache-miss tests.
    pub fn with_cities(base_time: DateTime<Utc>, cities: Vec<(String, f64)>) -> Self {
        Self { base_time, cities }
    }

    fn record_for(&self, city: &str, current_score: f64) -> CityMoodRecord {
        let mut rng = StdRng::seed_from_u64(seed_for(city));
        let mut timeline = Vec::with_capacity(TIMELINE_HOURS);

        for i in 0..TIMELINE_HOURS {
            let base = SCORE_CYCLE[i % SCORE_CYCLE.len()];
            let jitter: f64 = rng.gen_range(-0.1..=0.1);
            let score = (base + jitter).clamp(0.0, 1.0);
            timeline.push(MoodSample {
                timestamp: self.base_time - Duration::hours(i as i64),
                score,
            });
        }

        CityMoodRecord {
            city: city.to_string(),
            current_score,
            as_of: self.base_time,
            themes: default_themes(),
            timeline,
        }
    }
}

#[async_trait]
impl SentimentProvider for MockSentimentProvider {
    async fn fetch_all_cities(&self) -> anyhow::Result<Vec<CityMoodRecord>> {
        Ok(self
            .cities
            .iter()
            .map(|(city, score)| self.record_for(city, *score))
            .collect())
    }
}

fn default_themes() -> Vec<Theme> {
    vec![
        Theme {
            name: "Transport Safety & Transit".to_string(),
            description: "Public transportation and traffic safety issues".to_string(),
            impact: 0.3,
        },
        Theme {
            name: "Local Politics / Policy".to_string(),
            description: "Public opinion on local government decisions".to_string(),
            impact: 0.4,
        },
        Theme {
            name: "Crime & Policing".to_string(),
            description: "Safety concerns and police activity".to_string(),
            impact: 0.2,
        },
        Theme {
            name: "Weather".to_string(),
            description: "Current weather conditions and forecasts".to_string(),
            impact: 0.8,
        },
    ]
}

/// FNV-1a over the city name. A stable seed that does not depend on the
/// standard library's hasher internals.
fn seed_for(city: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in city.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_is_deterministic_per_city() {
        let base = Utc::now();
        let provider = MockSentimentProvider::new(base);

        let first = provider.fetch_all_cities().await.unwrap();
        let second = provider.fetch_all_cities().await.unwrap();

        assert_eq!(first.len(), 3);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.city, b.city);
            assert_eq!(a.timeline, b.timeline);
        }
    }

    #[tokio::test]
    async fn timeline_covers_twenty_four_hours_in_range() {
        let base = Utc::now();
        let provider = MockSentimentProvider::new(base);

        let records = provider.fetch_all_cities().await.unwrap();
        for record in &records {
            assert_eq!(record.timeline.len(), 24);
            for sample in &record.timeline {
                assert!((0.0..=1.0).contains(&sample.score));
                assert!(sample.timestamp <= base);
            }
        }
    }

    #[test]
    fn different_cities_get_different_seeds() {
        assert_ne!(seed_for("San Francisco"), seed_for("New York"));
    }
}
