use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to read sample file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to deserialize the sample payload: {0}")]
    Deserialization(String),

    #[error("Invalid data format in sample {index}: {reason}")]
    InvalidData { index: usize, reason: String },

    #[error("No sample source configured; set data_source.url or data_source.file")]
    NotConfigured,
}
