use crate::domain::{AudioClip, NormalizedAudio};

/// Decodes arbitrary audio into mono PCM at the target sample rate.
///
/// CPU-bound; async callers should run it on a blocking thread.
pub trait AudioNormalizer: Send + Sync {
    fn normalize(&self, clip: &AudioClip) -> Result<NormalizedAudio, DecodeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("no audio samples decoded")]
    Empty,
    #[error("resampling failed: {0}")]
    ResamplingFailed(String),
}
