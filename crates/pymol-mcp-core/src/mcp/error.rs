use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("Transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}
