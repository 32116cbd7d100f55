//! Discrete emotion categories and the mood-score classifier.

use serde::{Deserialize, Serialize};

/// A discrete emotion bucket for a normalized mood score.
///
/// `Disgusted` and `Fearful` exist for callers that assign emotions
/// directly; `from_score` never produces them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Surprised,
    Fearful,
    Disgusted,
    Neutral,
}

impl Default for Emotion {
    fn default() -> Self {
        Emotion::Neutral
    }
}

impl Emotion {
    /// Classify a mood score in [0, 1] into an emotion bucket.
    ///
    /// Buckets are half-open with a closed lower bound, so 0.2, 0.4, 0.6
    /// and 0.8 each land in the upper bucket. The score-to-emotion order is
    /// intentionally non-monotonic (Surprised sits above Neutral, not
    /// Angry); downstream display copy depends on it.
    ///
    /// NaN and anything outside [0, 1] fall back to `Neutral`.
    pub fn from_score(score: f64) -> Emotion {
        if (0.8..=1.0).contains(&score) {
            Emotion::Happy
        } else if (0.6..0.8).contains(&score) {
            Emotion::Surprised
        } else if (0.4..0.6).contains(&score) {
            Emotion::Neutral
        } else if (0.2..0.4).contains(&score) {
            Emotion::Sad
        } else if (0.0..0.2).contains(&score) {
            Emotion::Angry
        } else {
            Emotion::Neutral
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
            Emotion::Surprised => "Surprised",
            Emotion::Fearful => "Fearful",
            Emotion::Disgusted => "Disgusted",
            Emotion::Neutral => "Neutral",
        }
    }
}
