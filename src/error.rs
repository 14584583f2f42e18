#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("database returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("record encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("unexpected database payload shape")]
    UnexpectedPayload,
}
