pub mod cache;
pub mod mock;
pub mod provider;

pub use cache::SentimentCache;
pub use mock::MockSentimentProvider;
pub use provider::{SentimentError, SentimentProvider};
