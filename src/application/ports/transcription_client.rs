use std::io;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::AudioClip;

/// Client side of the upload boundary, used by the batch runner.
#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    async fn transcribe(&self, clip: AudioClip) -> Result<String, RowError>;
}

/// Every way a single dataset row can fail to get a transcript.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("audio file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("failed to read audio file {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("row has no filename")]
    MissingFilename,
    #[error("http error {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("connection error: {0}")]
    Connection(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("invalid json response: {0}")]
    InvalidJson(String),
    #[error("transcription not found in response")]
    MissingTranscript,
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl RowError {
    /// Stable label for logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) | Self::Io { .. } | Self::MissingFilename => "row_io",
            Self::HttpStatus { .. } => "http_status",
            Self::Connection(_) => "connection",
            Self::Timeout(_) => "timeout",
            Self::InvalidJson(_) => "invalid_json",
            Self::MissingTranscript => "missing_transcript",
            Self::Unexpected(_) => "unexpected",
        }
    }

    /// Failures worth another attempt when retries are enabled.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout(_) => true,
            Self::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
