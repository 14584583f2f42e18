use crate::types::geo::{haversine_km, GeoPoint, LocationFix};
use crate::types::run::{format_elapsed, RunSummary};

use super::clock::Clock;

/// Two-state machine: a run is either in progress or it is not. The start
/// instant and the previous-fix instant only exist while running, so stale
/// timestamps cannot leak across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running {
        started_at_ms: u64,
        last_fix_at_ms: Option<u64>,
    },
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running { .. })
    }
}

/// The one in-progress run. Owned exclusively by the tracker; everyone
/// else gets a read-only view.
#[derive(Debug)]
pub struct RunSession {
    state: RunState,
    path: Vec<GeoPoint>,
    total_distance_km: f64,
}

impl RunSession {
    fn new() -> Self {
        Self {
            state: RunState::Idle,
            path: Vec::new(),
            total_distance_km: 0.0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn path(&self) -> &[GeoPoint] {
        &self.path
    }

    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }
}

/// What one processed fix means for the display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixUpdate {
    pub total_distance_km: f64,
    /// Live speed in km/h; `None` while idle.
    pub speed_kmh: Option<f64>,
}

/// Synchronous accumulator behind the start/stop buttons. Invalid
/// transitions are no-ops with a distinguishable return value, never errors.
pub struct RunTracker<C> {
    clock: C,
    session: RunSession,
}

impl<C: Clock> RunTracker<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            session: RunSession::new(),
        }
    }

    pub fn session(&self) -> &RunSession {
        &self.session
    }

    /// Idle -> Running. Resets the accumulator and the path. Returns `false`
    /// without touching anything when a run is already in progress.
    pub fn start(&mut self) -> bool {
        if self.session.is_running() {
            tracing::debug!("start ignored: run already in progress");
            return false;
        }

        self.session.path.clear();
        self.session.total_distance_km = 0.0;
        self.session.state = RunState::Running {
            started_at_ms: self.clock.now_millis(),
            last_fix_at_ms: None,
        };

        tracing::info!("run started");
        true
    }

    /// Running -> Idle. Finalizes the session into a summary and discards
    /// the path. Returns `None` when no run is in progress.
    pub fn stop(&mut self) -> Option<RunSummary> {
        let RunState::Running { started_at_ms, .. } = self.session.state else {
            tracing::debug!("stop ignored: no run in progress");
            return None;
        };

        let elapsed_ms = self.clock.now_millis().saturating_sub(started_at_ms);
        let total_distance_km = self.session.total_distance_km;

        // A zero-length run has no meaningful average speed.
        let average_speed_kmh = if elapsed_ms == 0 {
            0.0
        } else {
            total_distance_km / (elapsed_ms as f64 / 3_600_000.0)
        };

        let summary = RunSummary {
            formatted_time: format_elapsed(elapsed_ms),
            average_speed_kmh,
            total_distance_km,
        };

        self.session.path.clear();
        self.session.total_distance_km = 0.0;
        self.session.state = RunState::Idle;

        tracing::info!(
            distance_km = summary.total_distance_km,
            speed_kmh = summary.average_speed_kmh,
            elapsed = %summary.formatted_time,
            "run stopped"
        );
        Some(summary)
    }

    /// Folds one location fix into the session. The point is always kept so
    /// the map has something to draw between runs, but distance only accrues
    /// while running.
    pub fn on_fix(&mut self, fix: &LocationFix) -> FixUpdate {
        let now_ms = self.clock.now_millis();
        let segment_km = self
            .session
            .path
            .last()
            .map(|prev| haversine_km(*prev, fix.point));

        let speed_kmh = match self.session.state {
            RunState::Running {
                started_at_ms,
                last_fix_at_ms,
            } => {
                if let Some(segment_km) = segment_km {
                    self.session.total_distance_km += segment_km;
                }

                let speed_kmh = match fix.speed_mps {
                    Some(mps) => mps * 3.6,
                    None => estimate_speed_kmh(segment_km, last_fix_at_ms, now_ms),
                };

                self.session.state = RunState::Running {
                    started_at_ms,
                    last_fix_at_ms: Some(now_ms),
                };
                Some(speed_kmh)
            }
            RunState::Idle => None,
        };

        self.session.path.push(fix.point);

        FixUpdate {
            total_distance_km: self.session.total_distance_km,
            speed_kmh,
        }
    }

    /// One elapsed-time tick. Only a running session has an elapsed time to
    /// report; while idle this observes nothing and changes nothing.
    pub fn on_tick(&mut self) -> Option<String> {
        let RunState::Running { started_at_ms, .. } = self.session.state else {
            return None;
        };

        let elapsed_ms = self.clock.now_millis().saturating_sub(started_at_ms);
        Some(format_elapsed(elapsed_ms))
    }
}

/// Fallback when a fix carries no reported speed: segment distance over the
/// time since the previous fix of this run. Zero when there is no usable
/// baseline.
fn estimate_speed_kmh(segment_km: Option<f64>, last_fix_at_ms: Option<u64>, now_ms: u64) -> f64 {
    match (segment_km, last_fix_at_ms) {
        (Some(segment_km), Some(last_ms)) if now_ms > last_ms => {
            segment_km / ((now_ms - last_ms) as f64 / 3_600_000.0)
        }
        _ => 0.0,
    }
}
