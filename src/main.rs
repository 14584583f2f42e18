use runtrack_rs::config::Config;
use runtrack_rs::store::{MemoryStore, RtdbStore, RunStore};
use runtrack_rs::tracker::{driver, SystemClock};
use runtrack_rs::types::geo::LocationFix;
use runtrack_rs::ui::TracingUi;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runtrack_rs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    match config.database_url.clone() {
        Some(url) => {
            tracing::info!(%url, "persisting runs to remote database");
            run(RtdbStore::new(url), &config).await;
        }
        None => {
            tracing::info!("RUN_DATABASE_URL not set, persisting runs in memory");
            run(MemoryStore::new(), &config).await;
        }
    }
}

/// Drives the tracker from stdin, standing in for the mobile UI: `start`
/// and `stop` lines are the two buttons, any other line is a JSON location
/// fix such as `{"point":{"lat":48.8566,"lon":2.3522},"speed_mps":2.5}`.
async fn run<S: RunStore + Clone>(store: S, config: &Config) {
    let handle = driver::spawn(
        SystemClock::new(),
        store.clone(),
        TracingUi,
        config.tick_interval,
        config.fix_channel_capacity,
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match line.trim() {
            "" => {}
            "start" => handle.start().await,
            "stop" => match handle.stop().await {
                Some(summary) => tracing::info!(
                    elapsed = %summary.formatted_time,
                    distance_km = summary.total_distance_km,
                    speed_kmh = summary.average_speed_kmh,
                    "run finished"
                ),
                None => tracing::warn!("stop ignored: no run in progress"),
            },
            fix_line => match serde_json::from_str::<LocationFix>(fix_line) {
                Ok(fix) => handle.report_fix(fix).await,
                Err(err) => tracing::warn!("unrecognized input line: {err}"),
            },
        }
    }

    // Close out any run still open before listing what was saved.
    if let Some(summary) = handle.stop().await {
        tracing::info!(elapsed = %summary.formatted_time, "run finished at end of input");
    }
    handle.shutdown().await;

    match store.list_runs().await {
        Ok(runs) => {
            for run in &runs {
                tracing::info!(
                    id = %run.id,
                    time = %run.record.time,
                    speed = run.record.speed,
                    distance = run.record.distance,
                    "stored run"
                );
            }
            tracing::info!(count = runs.len(), "listing complete");
        }
        Err(err) => tracing::error!("failed to list stored runs: {err}"),
    }
}
