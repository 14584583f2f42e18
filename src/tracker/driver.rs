use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::store::RunStore;
use crate::types::geo::LocationFix;
use crate::types::run::{RunRecord, RunSummary};
use crate::ui::UiSink;

use super::clock::Clock;
use super::run_tracker::RunTracker;

/// Everything the tracker task reacts to. Commands and fixes share one
/// queue so each input is folded in to completion before the next, the
/// single-dispatch discipline the state machine assumes.
#[derive(Debug)]
pub enum TrackerInput {
    Start,
    Stop {
        reply: oneshot::Sender<Option<RunSummary>>,
    },
    Fix(LocationFix),
}

/// Owner-side handle for a spawned tracker task.
pub struct TrackerHandle {
    inputs: mpsc::Sender<TrackerInput>,
    task: JoinHandle<()>,
}

impl TrackerHandle {
    pub async fn start(&self) {
        let _ = self.inputs.send(TrackerInput::Start).await;
    }

    /// Stops the current run and waits for the finalized summary. `None`
    /// when no run was in progress.
    pub async fn stop(&self) -> Option<RunSummary> {
        let (reply, response) = oneshot::channel();
        if self
            .inputs
            .send(TrackerInput::Stop { reply })
            .await
            .is_err()
        {
            return None;
        }
        response.await.ok().flatten()
    }

    pub async fn report_fix(&self, fix: LocationFix) {
        let _ = self.inputs.send(TrackerInput::Fix(fix)).await;
    }

    /// A cloneable sender for push-based location sources.
    pub fn input_sender(&self) -> mpsc::Sender<TrackerInput> {
        self.inputs.clone()
    }

    /// Closes the input queue and waits for the task to drain, including any
    /// in-flight persistence writes. The elapsed ticker dies with the task,
    /// so no tick can fire after this returns.
    pub async fn shutdown(self) {
        drop(self.inputs);
        let _ = self.task.await;
    }
}

/// Spawns the event loop that owns the tracker. All mutation happens inside
/// that one task; callers only hold the handle.
pub fn spawn<C, S, U>(
    clock: C,
    store: S,
    ui: U,
    tick_interval: Duration,
    channel_capacity: usize,
) -> TrackerHandle
where
    C: Clock + Clone,
    S: RunStore + Clone,
    U: UiSink,
{
    let (inputs, receiver) = mpsc::channel(channel_capacity);
    let task = tokio::spawn(run_loop(clock, store, ui, tick_interval, receiver));
    TrackerHandle { inputs, task }
}

async fn run_loop<C, S, U>(
    clock: C,
    store: S,
    ui: U,
    tick_interval: Duration,
    mut inputs: mpsc::Receiver<TrackerInput>,
) where
    C: Clock + Clone,
    S: RunStore + Clone,
    U: UiSink,
{
    let mut tracker = RunTracker::new(clock.clone());
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut pending_writes: Vec<JoinHandle<()>> = Vec::new();

    loop {
        tokio::select! {
            input = inputs.recv() => match input {
                None => break,
                Some(TrackerInput::Start) => {
                    tracker.start();
                }
                Some(TrackerInput::Stop { reply }) => {
                    let summary = tracker.stop();
                    if let Some(summary) = &summary {
                        pending_writes.retain(|write| !write.is_finished());
                        pending_writes.push(persist(&clock, &store, summary));
                    }
                    let _ = reply.send(summary);
                }
                Some(TrackerInput::Fix(fix)) => {
                    let update = tracker.on_fix(&fix);
                    ui.show_path(tracker.session().path());
                    if let Some(speed_kmh) = update.speed_kmh {
                        ui.show_speed(speed_kmh);
                    }
                }
            },
            _ = ticker.tick() => {
                if let Some(elapsed) = tracker.on_tick() {
                    ui.show_elapsed(&elapsed);
                }
            }
        }
    }

    // Input queue closed; let outstanding writes land before going away.
    for write in pending_writes {
        if let Err(err) = write.await {
            tracing::warn!("persistence task did not finish cleanly: {err}");
        }
    }
    tracing::debug!("tracker task shut down");
}

/// Fire-and-forget write. The event loop never blocks on the database; a
/// failed write is reported through the log, not back to the run.
fn persist<C, S>(clock: &C, store: &S, summary: &RunSummary) -> JoinHandle<()>
where
    C: Clock,
    S: RunStore + Clone,
{
    let id = format!("activity{}", clock.wall_time().timestamp_millis());
    let record = RunRecord::from(summary);
    let store = store.clone();

    tokio::spawn(async move {
        match store.put_run(&id, &record).await {
            Ok(()) => tracing::info!(%id, "run persisted"),
            Err(err) => tracing::error!(%id, "failed to persist run: {err}"),
        }
    })
}
