use serde_json::Value;

use crate::error::StoreError;
use crate::types::run::RunRecord;

use super::{decode_records, RunStore, StoredRun};

/// Node the mobile clients have always written under.
const RESULTS_NODE: &str = "runningResult";

/// Realtime database spoken over its JSON REST flavor: one `PUT` per
/// finished run, one `GET` of the whole node for the listing feed.
#[derive(Clone)]
pub struct RtdbStore {
    client: reqwest::Client,
    base_url: String,
}

impl RtdbStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

impl RunStore for RtdbStore {
    async fn put_run(&self, id: &str, record: &RunRecord) -> Result<(), StoreError> {
        let url = format!("{}/{}/{}.json", self.base_url, RESULTS_NODE, id);
        let response = self.client.put(&url).json(record).send().await?;

        if !response.status().is_success() {
            return Err(StoreError::Status(response.status()));
        }
        Ok(())
    }

    async fn list_runs(&self) -> Result<Vec<StoredRun>, StoreError> {
        let url = format!("{}/{}.json", self.base_url, RESULTS_NODE);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(StoreError::Status(response.status()));
        }

        match response.json::<Value>().await? {
            // An empty node comes back as a JSON null, not an empty map.
            Value::Null => Ok(Vec::new()),
            Value::Object(map) => Ok(decode_records(map)),
            _ => Err(StoreError::UnexpectedPayload),
        }
    }
}
