use std::sync::{Arc, Mutex};
use std::time::Duration;

use runtrack_rs::store::{MemoryStore, RunStore};
use runtrack_rs::tracker::{driver, ManualClock};
use runtrack_rs::types::geo::{haversine_km, GeoPoint, LocationFix};
use runtrack_rs::ui::UiSink;

#[derive(Clone, Default)]
struct CapturingUi {
    inner: Arc<Mutex<Captured>>,
}

#[derive(Default)]
struct Captured {
    elapsed: Vec<String>,
    speeds: Vec<f64>,
    path_lens: Vec<usize>,
}

impl CapturingUi {
    fn elapsed(&self) -> Vec<String> {
        self.inner.lock().unwrap().elapsed.clone()
    }

    fn speeds(&self) -> Vec<f64> {
        self.inner.lock().unwrap().speeds.clone()
    }

    fn path_lens(&self) -> Vec<usize> {
        self.inner.lock().unwrap().path_lens.clone()
    }
}

impl UiSink for CapturingUi {
    fn show_elapsed(&self, formatted: &str) {
        self.inner.lock().unwrap().elapsed.push(formatted.to_owned());
    }

    fn show_speed(&self, speed_kmh: f64) {
        self.inner.lock().unwrap().speeds.push(speed_kmh);
    }

    fn show_path(&self, path: &[GeoPoint]) {
        self.inner.lock().unwrap().path_lens.push(path.len());
    }
}

fn paris_a() -> LocationFix {
    LocationFix::new(GeoPoint::new(48.8566, 2.3522))
}

fn paris_b() -> LocationFix {
    LocationFix::new(GeoPoint::new(48.8584, 2.2945))
}

/// Lets the spawned tracker task drain its queue under the paused runtime.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn completed_run_is_persisted_with_matching_record() {
    let clock = ManualClock::new();
    let store = MemoryStore::new();
    let ui = CapturingUi::default();
    let handle = driver::spawn(
        clock.clone(),
        store.clone(),
        ui.clone(),
        Duration::from_secs(1),
        16,
    );

    handle.start().await;
    handle.report_fix(paris_a()).await;
    handle.report_fix(paris_b()).await;
    settle().await;
    clock.advance(7_200_000);

    // The stop command queues behind the fixes, so the summary covers both.
    let summary = handle.stop().await.expect("a run was in progress");
    handle.shutdown().await;

    assert_eq!(summary.formatted_time, "02:00:00");
    assert!(summary.total_distance_km > 4.1 && summary.total_distance_km < 4.35);

    let runs = store.list_runs().await.expect("listing");
    assert_eq!(runs.len(), 1);
    assert!(runs[0].id.starts_with("activity"));
    let record = &runs[0].record;
    assert_eq!(record.time, summary.formatted_time);
    assert!((record.distance - summary.total_distance_km).abs() < 1e-12);
    assert!((record.speed - summary.average_speed_kmh).abs() < 1e-12);

    // Both fixes reached the display, and the second one carried a speed.
    assert_eq!(ui.path_lens(), vec![1, 2]);
    assert_eq!(ui.speeds().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn stop_while_idle_persists_nothing() {
    let store = MemoryStore::new();
    let handle = driver::spawn(
        ManualClock::new(),
        store.clone(),
        CapturingUi::default(),
        Duration::from_secs(1),
        16,
    );

    assert!(handle.stop().await.is_none());
    handle.shutdown().await;

    assert!(store.is_empty());
}

#[tokio::test(start_paused = true)]
async fn ticker_reports_elapsed_time_each_second() {
    let clock = ManualClock::new();
    let ui = CapturingUi::default();
    let handle = driver::spawn(
        clock.clone(),
        MemoryStore::new(),
        ui.clone(),
        Duration::from_secs(1),
        16,
    );

    handle.start().await;
    settle().await;

    for _ in 0..3 {
        clock.advance(1_000);
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
    }

    let summary = handle.stop().await.expect("running");
    handle.shutdown().await;

    assert_eq!(summary.formatted_time, "00:00:03");
    let elapsed = ui.elapsed();
    assert!(elapsed.contains(&"00:00:03".to_string()), "got {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn late_fixes_stay_out_of_the_finalized_run() {
    let clock = ManualClock::new();
    let store = MemoryStore::new();
    let ui = CapturingUi::default();
    let handle = driver::spawn(
        clock.clone(),
        store.clone(),
        ui.clone(),
        Duration::from_secs(1),
        16,
    );

    // First run: one segment.
    handle.start().await;
    handle.report_fix(paris_a()).await;
    handle.report_fix(paris_b()).await;
    settle().await;
    clock.advance(1_800_000);
    let first = handle.stop().await.expect("first run");

    // A fix straggling in after the stop only seeds the idle map.
    handle.report_fix(LocationFix::new(GeoPoint::new(48.9000, 2.4000))).await;

    // Second run: a different, shorter segment.
    let c = GeoPoint::new(48.8600, 2.3500);
    let d = GeoPoint::new(48.8610, 2.3510);
    clock.advance(60_000);
    handle.start().await;
    handle.report_fix(LocationFix::new(c)).await;
    handle.report_fix(LocationFix::new(d)).await;
    settle().await;
    clock.advance(600_000);
    let second = handle.stop().await.expect("second run");
    handle.shutdown().await;

    let expected_second = haversine_km(c, d);
    assert!((second.total_distance_km - expected_second).abs() < 1e-9);
    assert!(second.total_distance_km < first.total_distance_km);

    let runs = store.list_runs().await.expect("listing");
    assert_eq!(runs.len(), 2);
    assert!((runs[0].record.distance - first.total_distance_km).abs() < 1e-12);
    assert!((runs[1].record.distance - second.total_distance_km).abs() < 1e-12);
}
