use std::future::Future;

use serde_json::Value;

use crate::error::StoreError;
use crate::types::run::RunRecord;

mod memory;
mod rtdb;

pub use memory::MemoryStore;
pub use rtdb::RtdbStore;

/// One rehydrated listing entry.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRun {
    pub id: String,
    pub record: RunRecord,
}

/// Write-once persistence for completed runs, plus the read path that feeds
/// the activity list. Ids are caller-generated and unique per run.
pub trait RunStore: Send + Sync + 'static {
    fn put_run(
        &self,
        id: &str,
        record: &RunRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn list_runs(&self) -> impl Future<Output = Result<Vec<StoredRun>, StoreError>> + Send;
}

/// Decodes the id -> record map as stored. The database is schema-less and
/// older clients may have written partial entries, so anything missing one
/// of the `time`/`speed`/`distance` fields is skipped rather than failing
/// the whole listing.
pub(crate) fn decode_records(map: serde_json::Map<String, Value>) -> Vec<StoredRun> {
    let mut runs: Vec<StoredRun> = map
        .into_iter()
        .filter_map(|(id, value)| match serde_json::from_value::<RunRecord>(value) {
            Ok(record) => Some(StoredRun { id, record }),
            Err(err) => {
                tracing::debug!(%id, "skipping malformed run record: {err}");
                None
            }
        })
        .collect();

    // Ids are timestamp-derived, so this is chronological order.
    runs.sort_by(|a, b| a.id.cmp(&b.id));
    runs
}
