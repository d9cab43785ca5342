use async_trait::async_trait;
use reqwest::multipart;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::application::ports::{InferenceError, InferenceGateway};
use crate::domain::NormalizedAudio;

use super::wav::wav_part;

/// Any server speaking the OpenAI `audio/transcriptions` protocol
/// (OpenAI itself, whisper.cpp server, faster-whisper-server, ...).
pub struct OpenAiInferenceGateway {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<SecretString>,
}

impl OpenAiInferenceGateway {
    pub fn new(base_url: &str, model: &str, api_key: Option<SecretString>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/audio/transcriptions", base_url.trim_end_matches('/')),
            model: model.to_string(),
            api_key,
        }
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[async_trait]
impl InferenceGateway for OpenAiInferenceGateway {
    async fn transcribe(&self, audio: &NormalizedAudio) -> Result<String, InferenceError> {
        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json")
            .part("file", wav_part(audio)?);

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, samples = audio.len(), "Sending audio to inference endpoint");

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| InferenceError::RequestFailed(format!("request: {}", e)))?;

        read_transcript(response).await
    }
}

pub(crate) async fn read_transcript(response: reqwest::Response) -> Result<String, InferenceError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(InferenceError::RequestFailed(format!(
            "status {}: {}",
            status, body
        )));
    }

    let result: TranscriptionResponse = response
        .json()
        .await
        .map_err(|e| InferenceError::InvalidResponse(format!("parse response: {}", e)))?;

    tracing::info!(chars = result.text.len(), "Inference completed");

    Ok(result.text.trim().to_string())
}
