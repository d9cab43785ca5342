use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde_json::Value;

use crate::application::ports::{RowError, TranscriptionClient};
use crate::domain::AudioClip;

/// Uploads clips to a running `/asr` endpoint.
pub struct HttpTranscriptionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTranscriptionClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RowError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RowError::Unexpected(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

fn mime_for(clip: &AudioClip) -> &'static str {
    match clip.extension().as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        _ => "application/octet-stream",
    }
}

fn classify(e: reqwest::Error) -> RowError {
    if e.is_timeout() {
        RowError::Timeout(e.to_string())
    } else if e.is_connect() {
        RowError::Connection(e.to_string())
    } else {
        RowError::Unexpected(e.to_string())
    }
}

#[async_trait]
impl TranscriptionClient for HttpTranscriptionClient {
    #[tracing::instrument(skip(self, clip), fields(filename = %clip.filename, bytes = clip.len()))]
    async fn transcribe(&self, clip: AudioClip) -> Result<String, RowError> {
        let mime = mime_for(&clip);
        let part = multipart::Part::bytes(clip.data.to_vec())
            .file_name(clip.filename.clone())
            .mime_str(mime)
            .map_err(|e| RowError::Unexpected(format!("mime: {}", e)))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        if !status.is_success() {
            return Err(RowError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value =
            serde_json::from_str(&body).map_err(|e| RowError::InvalidJson(e.to_string()))?;

        payload
            .get("transcription")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(RowError::MissingTranscript)
    }
}
