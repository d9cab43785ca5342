use std::time::Duration;

use async_trait::async_trait;

use crate::domain::NormalizedAudio;

/// Acoustic model capability: normalized waveform in, transcript out.
///
/// Implementations must not retry internally; callers own retry and timeout
/// policy.
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    async fn transcribe(&self, audio: &NormalizedAudio) -> Result<String, InferenceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("inference request failed: {0}")]
    RequestFailed(String),
    #[error("inference timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid inference response: {0}")]
    InvalidResponse(String),
    #[error("inference gateway misconfigured: {0}")]
    Configuration(String),
}
