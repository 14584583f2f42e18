use serde::{Deserialize, Serialize};

/// Immutable snapshot of one completed run, produced at stop time.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub formatted_time: String,
    pub average_speed_kmh: f64,
    pub total_distance_km: f64,
}

/// The field triple persisted per run, matching what the mobile clients
/// already write to the remote database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub time: String,
    pub speed: f64,
    pub distance: f64,
}

impl From<&RunSummary> for RunRecord {
    fn from(summary: &RunSummary) -> Self {
        Self {
            time: summary.formatted_time.clone(),
            speed: summary.average_speed_kmh,
            distance: summary.total_distance_km,
        }
    }
}

/// Truncates a millisecond duration into zero-padded `HH:MM:SS`. Hours are
/// not wrapped at 24.
pub fn format_elapsed(milliseconds: u64) -> String {
    let seconds = (milliseconds / 1000) % 60;
    let minutes = (milliseconds / 60_000) % 60;
    let hours = milliseconds / 3_600_000;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
