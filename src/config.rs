use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub tick_interval: Duration,
    pub database_url: Option<String>,
    pub fix_channel_capacity: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let tick_interval_ms = std::env::var("TICK_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1000);

        let database_url = std::env::var("RUN_DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let fix_channel_capacity = std::env::var("FIX_CHANNEL_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(64);

        Self {
            tick_interval: Duration::from_millis(tick_interval_ms),
            database_url,
            fix_channel_capacity,
        }
    }
}
