//! End-to-end persistence: a tracker's history survives a restart through
//! each store backend, and the rebuilt frequency map matches the one the
//! original process had.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use moodpulse::{
    HistoryStore, JsonHistoryStore, LocationFix, LocationSignificanceTracker, SqliteHistoryStore,
};

fn fix(lat: f64, lon: f64, at: DateTime<Utc>) -> LocationFix {
    LocationFix {
        lat,
        lon,
        timestamp: at,
    }
}

fn temp_path(name: &str, ext: &str) -> PathBuf {
    std::env::temp_dir()
        .join("moodpulse-tests")
        .join(format!("{}-{}.{}", name, uuid::Uuid::new_v4(), ext))
}

async fn run_roundtrip(store: Arc<dyn HistoryStore>) {
    let _ = env_logger::builder().is_test(true).try_init();

    let start = Utc::now();
    let visits = [
        ("Austin", "Downtown"),
        ("Dallas", "Deep Ellum"),
        ("Austin", "Hyde Park"),
        ("Unknown", "Unknown"),
        ("Houston", "Montrose"),
    ];

    let expected_top;
    {
        let mut tracker = LocationSignificanceTracker::empty(store.clone());
        for (i, (city, locality)) in visits.into_iter().enumerate() {
            let accepted = tracker
                .ingest(
                    fix(30.0, -97.0, start + Duration::seconds(i as i64 * 601)),
                    city,
                    locality,
                )
                .await
                .unwrap();
            assert!(accepted);
        }
        expected_top = tracker.top_places(10);
    }

    // "Restart": a fresh tracker restored from the same store.
    let restored = LocationSignificanceTracker::load(store).await.unwrap();

    assert_eq!(restored.history().len(), visits.len());
    assert_eq!(restored.top_places(10), expected_top);
    assert_eq!(
        restored.top_places(1),
        vec![("Austin".to_string(), 2)],
        "replay must count Austin twice and skip Unknown"
    );
}

#[tokio::test]
async fn json_store_survives_restart() {
    let path = temp_path("roundtrip", "json");
    let store = Arc::new(JsonHistoryStore::new(path.clone()).unwrap());

    run_roundtrip(store).await;

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn sqlite_store_survives_restart() {
    let path = temp_path("roundtrip", "sqlite3");
    let store = Arc::new(SqliteHistoryStore::new(path.clone()).unwrap());

    run_roundtrip(store).await;

    std::fs::remove_file(path).ok();
}
