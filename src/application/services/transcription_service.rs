use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::{self, BoxStream};

use crate::application::ports::{
    AudioNormalizer, DecodeError, InferenceError, InferenceGateway, StagingStore,
    StagingStoreError,
};
use crate::domain::{AudioClip, StagingKey, TranscriptionResult};

pub const DEFAULT_INFERENCE_TIMEOUT: Duration = Duration::from_secs(120);

/// Handles one upload end to end: stage, normalize, infer, release.
///
/// The staging slot is released on every path out of
/// [`TranscriptionService::transcribe_stream`]; a failed release is logged and
/// never replaces the outcome the caller sees.
pub struct TranscriptionService {
    normalizer: Arc<dyn AudioNormalizer>,
    gateway: Arc<dyn InferenceGateway>,
    staging_store: Arc<dyn StagingStore>,
    inference_timeout: Duration,
}

impl TranscriptionService {
    pub fn new(
        normalizer: Arc<dyn AudioNormalizer>,
        gateway: Arc<dyn InferenceGateway>,
        staging_store: Arc<dyn StagingStore>,
    ) -> Self {
        Self {
            normalizer,
            gateway,
            staging_store,
            inference_timeout: DEFAULT_INFERENCE_TIMEOUT,
        }
    }

    pub fn with_inference_timeout(mut self, timeout: Duration) -> Self {
        self.inference_timeout = timeout;
        self
    }

    pub async fn transcribe(
        &self,
        clip: AudioClip,
    ) -> Result<TranscriptionResult, TranscriptionServiceError> {
        let AudioClip { filename, data } = clip;
        let content_length = data.len() as u64;
        let stream = stream::once(async move { Ok::<Bytes, io::Error>(data) }).boxed();
        self.transcribe_stream(&filename, stream, Some(content_length))
            .await
    }

    #[tracing::instrument(skip(self, filename, stream, content_length), fields(filename = %filename))]
    pub async fn transcribe_stream(
        &self,
        filename: &str,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
        content_length: Option<u64>,
    ) -> Result<TranscriptionResult, TranscriptionServiceError> {
        let key = StagingKey::for_upload(filename);

        let outcome = self
            .stage_and_transcribe(&key, filename, stream, content_length)
            .await;

        self.release(&key).await;

        if let Err(e) = &outcome {
            tracing::warn!(error = %e, "Transcription failed");
        }
        outcome
    }

    async fn stage_and_transcribe(
        &self,
        key: &StagingKey,
        filename: &str,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
        content_length: Option<u64>,
    ) -> Result<TranscriptionResult, TranscriptionServiceError> {
        let staged_bytes = self
            .staging_store
            .store(key, stream, content_length)
            .await?;
        tracing::debug!(key = %key, bytes = staged_bytes, "Upload staged");

        let data = self.staging_store.fetch(key).await?;
        let clip = AudioClip::new(filename, data);

        let normalizer = Arc::clone(&self.normalizer);
        let audio = tokio::task::spawn_blocking(move || normalizer.normalize(&clip))
            .await
            .map_err(|e| DecodeError::DecodingFailed(format!("normalizer task: {}", e)))??;

        tracing::debug!(
            samples = audio.len(),
            sample_rate = audio.sample_rate(),
            "Audio normalized"
        );

        let transcript =
            match tokio::time::timeout(self.inference_timeout, self.gateway.transcribe(&audio))
                .await
            {
                Ok(result) => result?,
                Err(_) => return Err(InferenceError::Timeout(self.inference_timeout).into()),
            };

        let duration_seconds = audio.duration_seconds();

        tracing::info!(
            chars = transcript.len(),
            duration_secs = duration_seconds,
            "Upload transcribed"
        );

        Ok(TranscriptionResult::new(
            transcript,
            duration_seconds,
            filename.to_string(),
        ))
    }

    async fn release(&self, key: &StagingKey) {
        if let Err(e) = self.staging_store.delete(key).await {
            tracing::warn!(error = %e, key = %key, "Failed to release staging slot");
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionServiceError {
    #[error("decode: {0}")]
    Decode(#[from] DecodeError),
    #[error("inference: {0}")]
    Inference(#[from] InferenceError),
    #[error("staging: {0}")]
    Staging(#[from] StagingStoreError),
}
