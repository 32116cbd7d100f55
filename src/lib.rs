//! Mood timeline and location-significance engine.
//!
//! Three pieces share one shape (raw, continuous input reduced to
//! discretized, summarized state under staleness and threshold rules):
//!
//! - [`sentiment::SentimentCache`] serves per-city mood records with lazy
//!   TTL expiry over an injected [`sentiment::SentimentProvider`].
//! - [`timeline::bucketize`] collapses a city's irregular mood timeline
//!   into fixed, labeled daypart entries with a "current" marker.
//! - [`location::LocationSignificanceTracker`] filters raw GPS fixes by
//!   distance/time thresholds, keeps a bounded visit history behind a
//!   [`location::HistoryStore`], and derives visit frequency and a map
//!   viewport from it.
//!
//! This is a library, not a service: collaborators (provider, geocoder,
//! store, clock) are injected, and UI-facing state changes surface through
//! [`events::ChangeHub`] instead of a reactive framework.

pub mod clock;
pub mod emotion;
pub mod events;
pub mod location;
pub mod models;
pub mod sentiment;
pub mod timeline;

pub use clock::{Clock, SystemClock};
pub use emotion::Emotion;
pub use events::{ChangeEvent, ChangeHub};
pub use location::{
    HistoryStore, JsonHistoryStore, LocationSignificanceTracker, MemoryHistoryStore,
    SqliteHistoryStore,
};
pub use models::{
    CityMoodRecord, Coordinate, LocationFix, LocationRecord, MoodSample, Region, Theme,
};
pub use sentiment::{MockSentimentProvider, SentimentCache, SentimentError, SentimentProvider};
pub use timeline::{bucketize, DayLabel, SegmentLabel, TimelineEntry};
