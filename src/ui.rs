use crate::types::geo::GeoPoint;

/// Fire-and-forget display updates. The tracker task calls these inline
/// between events, so implementations must not block.
pub trait UiSink: Send + Sync + 'static {
    /// Periodic elapsed time, already formatted as `HH:MM:SS`.
    fn show_elapsed(&self, formatted: &str);
    /// Live speed while a run is in progress, in km/h.
    fn show_speed(&self, speed_kmh: f64);
    /// The evolving path, for map rendering.
    fn show_path(&self, path: &[GeoPoint]);
}

/// Stand-in for the screen when running headless: display updates go to the
/// log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingUi;

impl UiSink for TracingUi {
    fn show_elapsed(&self, formatted: &str) {
        tracing::info!(elapsed = %formatted, "tick");
    }

    fn show_speed(&self, speed_kmh: f64) {
        tracing::info!(speed_kmh, "live speed");
    }

    fn show_path(&self, path: &[GeoPoint]) {
        tracing::debug!(points = path.len(), "path updated");
    }
}
