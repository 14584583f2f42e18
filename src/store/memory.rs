use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use crate::error::StoreError;
use crate::types::run::RunRecord;

use super::{decode_records, RunStore, StoredRun};

/// Schema-less in-memory stand-in for the remote database. Values are kept
/// as raw JSON so the listing path sees the same shapes the remote store
/// would hand back.
#[derive(Clone, Default)]
pub struct MemoryStore {
    runs: Arc<DashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an arbitrary value under a run id, bypassing the record
    /// schema. Lets tests model entries written by other clients.
    pub fn insert_raw(&self, id: impl Into<String>, value: Value) {
        self.runs.insert(id.into(), value);
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

impl RunStore for MemoryStore {
    async fn put_run(&self, id: &str, record: &RunRecord) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)?;
        self.runs.insert(id.to_string(), value);
        Ok(())
    }

    async fn list_runs(&self) -> Result<Vec<StoredRun>, StoreError> {
        let map = self
            .runs
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        Ok(decode_records(map))
    }
}
