use async_trait::async_trait;
use reqwest::multipart;
use secrecy::{ExposeSecret, SecretString};

use crate::application::ports::{InferenceError, InferenceGateway};
use crate::domain::NormalizedAudio;

use super::openai_inference_gateway::read_transcript;
use super::wav::wav_part;

pub struct AzureInferenceGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

impl AzureInferenceGateway {
    pub fn new(base_url: &str, deployment: &str, api_key: SecretString, api_version: &str) -> Self {
        let endpoint = format!(
            "{}/openai/deployments/{}/audio/transcriptions?api-version={}",
            base_url.trim_end_matches('/'),
            deployment,
            api_version,
        );
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl InferenceGateway for AzureInferenceGateway {
    async fn transcribe(&self, audio: &NormalizedAudio) -> Result<String, InferenceError> {
        let form = multipart::Form::new().part("file", wav_part(audio)?);

        tracing::debug!(endpoint = %self.endpoint, "Sending audio to Azure OpenAI deployment");

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| InferenceError::RequestFailed(format!("request: {}", e)))?;

        read_transcript(response).await
    }
}
