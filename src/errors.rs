#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}
