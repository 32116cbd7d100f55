//! Reduces a city's raw mood timeline to a fixed sequence of labeled
//! daypart entries for display.
//!
//! Seven slots exist: two for yesterday, four for today, one predicted
//! Tomorrow/Morning. Each of the six lookup slots scans the timeline for a
//! sample on the right calendar day inside the slot's hour window. Samples
//! are scanned newest-first, so when several fall in one window the latest
//! wins. Slots with no matching sample are omitted; if none match at all, a
//! fixed fallback sequence is returned instead.

use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;
use crate::models::CityMoodRecord;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DayLabel {
    Yesterday,
    Today,
    Tomorrow,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SegmentLabel {
    Morning,
    Afternoon,
    Evening,
    Night,
}

/// One display-ready daypart. A new bucketization replaces the whole list;
/// entries are never mutated in place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub day: DayLabel,
    pub segment: SegmentLabel,
    pub emotion: Emotion,
    pub is_now: bool,
}

struct Slot {
    day: DayLabel,
    segment: SegmentLabel,
    /// Calendar-day offset from `now`: -1 = yesterday, 0 = today.
    day_offset: i64,
    /// Hours (UTC, inclusive) a sample must fall in to fill this slot.
    sample_hours: RangeInclusive<u32>,
    /// Hours during which this slot is marked as the current one.
    now_hours: Option<RangeInclusive<u32>>,
}

/// The six lookup slots, in display order. Tomorrow/Morning is appended
/// separately since it is predicted, not looked up.
const SLOTS: [Slot; 6] = [
    Slot {
        day: DayLabel::Yesterday,
        segment: SegmentLabel::Evening,
        day_offset: -1,
        sample_hours: 18..=19,
        now_hours: None,
    },
    Slot {
        day: DayLabel::Yesterday,
        segment: SegmentLabel::Night,
        day_offset: -1,
        sample_hours: 21..=22,
        now_hours: None,
    },
    Slot {
        day: DayLabel::Today,
        segment: SegmentLabel::Morning,
        day_offset: 0,
        sample_hours: 8..=9,
        now_hours: Some(8..=11),
    },
    Slot {
        day: DayLabel::Today,
        segment: SegmentLabel::Afternoon,
        day_offset: 0,
        sample_hours: 14..=15,
        now_hours: Some(12..=17),
    },
    Slot {
        day: DayLabel::Today,
        segment: SegmentLabel::Evening,
        day_offset: 0,
        sample_hours: 18..=19,
        now_hours: Some(18..=20),
    },
    Slot {
        day: DayLabel::Today,
        segment: SegmentLabel::Night,
        day_offset: 0,
        sample_hours: 21..=22,
        now_hours: Some(21..=23),
    },
];

/// Bucketize one city's timeline relative to `now`. Always returns 6 or 7
/// entries in chronological display order.
pub fn bucketize(record: &CityMoodRecord, now: DateTime<Utc>) -> Vec<TimelineEntry> {
    // Newest first, so "first match" below means the latest sample in the
    // slot's window.
    let mut samples = record.timeline.clone();
    samples.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let current_hour = now.hour();
    let mut entries = Vec::with_capacity(SLOTS.len() + 1);

    for slot in &SLOTS {
        let slot_date = (now + Duration::days(slot.day_offset)).date_naive();
        let matched = samples.iter().find(|sample| {
            sample.timestamp.date_naive() == slot_date
                && slot.sample_hours.contains(&sample.timestamp.hour())
        });

        if let Some(sample) = matched {
            entries.push(TimelineEntry {
                day: slot.day,
                segment: slot.segment,
                emotion: Emotion::from_score(sample.score),
                is_now: slot
                    .now_hours
                    .as_ref()
                    .map_or(false, |hours| hours.contains(&current_hour)),
            });
        }
    }

    if entries.is_empty() {
        return fallback_entries();
    }

    // Prediction for tomorrow morning, derived from the city's current
    // score rather than a timeline lookup.
    entries.push(TimelineEntry {
        day: DayLabel::Tomorrow,
        segment: SegmentLabel::Morning,
        emotion: Emotion::from_score(record.current_score),
        is_now: false,
    });

    entries
}

/// The hardcoded sequence shown when no timeline sample fits any slot.
fn fallback_entries() -> Vec<TimelineEntry> {
    vec![
        TimelineEntry {
            day: DayLabel::Yesterday,
            segment: SegmentLabel::Evening,
            emotion: Emotion::Neutral,
            is_now: false,
        },
        TimelineEntry {
            day: DayLabel::Yesterday,
            segment: SegmentLabel::Night,
            emotion: Emotion::Angry,
            is_now: false,
        },
        TimelineEntry {
            day: DayLabel::Today,
            segment: SegmentLabel::Morning,
            emotion: Emotion::Sad,
            is_now: false,
        },
        TimelineEntry {
            day: DayLabel::Today,
            segment: SegmentLabel::Afternoon,
            emotion: Emotion::Neutral,
            is_now: true,
        },
        TimelineEntry {
            day: DayLabel::Today,
            segment: SegmentLabel::Evening,
            emotion: Emotion::Neutral,
            is_now: false,
        },
        TimelineEntry {
            day: DayLabel::Today,
            segment: SegmentLabel::Night,
            emotion: Emotion::Happy,
            is_now: false,
        },
        TimelineEntry {
            day: DayLabel::Tomorrow,
            segment: SegmentLabel::Morning,
            emotion: Emotion::Neutral,
            is_now: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MoodSample;
    use chrono::TimeZone;

    fn record_with(timeline: Vec<MoodSample>, current_score: f64) -> CityMoodRecord {
        CityMoodRecord {
            city: "Austin".to_string(),
            current_score,
            as_of: Utc::now(),
            themes: vec![],
            timeline,
        }
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn empty_window_coverage_yields_verbatim_fallback() {
        // Samples exist but none land in any slot window.
        let now = at(2026, 3, 10, 15, 0);
        let record = record_with(
            vec![
                MoodSample {
                    timestamp: at(2026, 3, 10, 3, 0),
                    score: 0.9,
                },
                MoodSample {
                    timestamp: at(2026, 3, 9, 12, 0),
                    score: 0.1,
                },
            ],
            0.5,
        );

        let entries = bucketize(&record, now);

        assert_eq!(entries, fallback_entries());
        assert_eq!(entries.len(), 7);
    }

    #[test]
    fn single_yesterday_evening_sample_matches_and_appends_prediction() {
        let now = at(2026, 3, 10, 10, 0);
        let record = record_with(
            vec![MoodSample {
                timestamp: at(2026, 3, 9, 18, 30),
                score: 0.9,
            }],
            0.7,
        );

        let entries = bucketize(&record, now);

        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            TimelineEntry {
                day: DayLabel::Yesterday,
                segment: SegmentLabel::Evening,
                emotion: Emotion::Happy,
                is_now: false,
            }
        );
        assert_eq!(
            entries[1],
            TimelineEntry {
                day: DayLabel::Tomorrow,
                segment: SegmentLabel::Morning,
                emotion: Emotion::Surprised, // classify(0.7)
                is_now: false,
            }
        );
    }

    #[test]
    fn is_now_follows_the_current_hour() {
        let now = at(2026, 3, 10, 15, 0);
        let record = record_with(
            vec![
                MoodSample {
                    timestamp: at(2026, 3, 10, 8, 15),
                    score: 0.5,
                },
                MoodSample {
                    timestamp: at(2026, 3, 10, 14, 30),
                    score: 0.5,
                },
            ],
            0.5,
        );

        let entries = bucketize(&record, now);

        let morning = entries
            .iter()
            .find(|e| e.segment == SegmentLabel::Morning && e.day == DayLabel::Today)
            .unwrap();
        let afternoon = entries
            .iter()
            .find(|e| e.segment == SegmentLabel::Afternoon)
            .unwrap();
        assert!(!morning.is_now);
        assert!(afternoon.is_now);
    }

    #[test]
    fn latest_sample_in_a_window_wins() {
        let now = at(2026, 3, 10, 10, 0);
        let record = record_with(
            vec![
                MoodSample {
                    timestamp: at(2026, 3, 9, 18, 5),
                    score: 0.1, // earlier, should lose
                },
                MoodSample {
                    timestamp: at(2026, 3, 9, 19, 45),
                    score: 0.9, // latest in [18, 19], should win
                },
            ],
            0.5,
        );

        let entries = bucketize(&record, now);
        assert_eq!(entries[0].emotion, Emotion::Happy);
    }

    #[test]
    fn slots_come_out_in_display_order() {
        let now = at(2026, 3, 10, 22, 0);
        let record = record_with(
            vec![
                MoodSample {
                    timestamp: at(2026, 3, 10, 21, 30),
                    score: 0.5,
                },
                MoodSample {
                    timestamp: at(2026, 3, 9, 18, 30),
                    score: 0.5,
                },
                MoodSample {
                    timestamp: at(2026, 3, 10, 8, 0),
                    score: 0.5,
                },
            ],
            0.9,
        );

        let entries = bucketize(&record, now);

        let labels: Vec<(DayLabel, SegmentLabel)> =
            entries.iter().map(|e| (e.day, e.segment)).collect();
        assert_eq!(
            labels,
            vec![
                (DayLabel::Yesterday, SegmentLabel::Evening),
                (DayLabel::Today, SegmentLabel::Morning),
                (DayLabel::Today, SegmentLabel::Night),
                (DayLabel::Tomorrow, SegmentLabel::Morning),
            ]
        );
        // 22:00 falls in the night slot's now-window.
        assert!(entries[2].is_now);
    }

    #[test]
    fn unsorted_timeline_is_handled() {
        let now = at(2026, 3, 10, 10, 0);
        // Deliberately out of order.
        let record = record_with(
            vec![
                MoodSample {
                    timestamp: at(2026, 3, 10, 8, 30),
                    score: 0.3,
                },
                MoodSample {
                    timestamp: at(2026, 3, 9, 21, 15),
                    score: 0.9,
                },
                MoodSample {
                    timestamp: at(2026, 3, 9, 18, 45),
                    score: 0.1,
                },
            ],
            0.5,
        );

        let entries = bucketize(&record, now);

        assert_eq!(entries[0].segment, SegmentLabel::Evening);
        assert_eq!(entries[0].emotion, Emotion::Angry);
        assert_eq!(entries[1].segment, SegmentLabel::Night);
        assert_eq!(entries[1].emotion, Emotion::Happy);
        assert_eq!(entries[2].segment, SegmentLabel::Morning);
        assert_eq!(entries[2].emotion, Emotion::Sad);
    }
}
