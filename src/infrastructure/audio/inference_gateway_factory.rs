use std::sync::Arc;

use crate::application::ports::{InferenceError, InferenceGateway};
use crate::presentation::config::{InferenceProvider, InferenceSettings};

use super::azure_inference_gateway::AzureInferenceGateway;
use super::openai_inference_gateway::OpenAiInferenceGateway;

pub struct InferenceGatewayFactory;

impl InferenceGatewayFactory {
    pub fn create(settings: &InferenceSettings) -> Result<Arc<dyn InferenceGateway>, InferenceError> {
        match settings.provider {
            InferenceProvider::OpenAi => {
                let gateway = OpenAiInferenceGateway::new(
                    &settings.base_url,
                    &settings.model,
                    settings.api_key.clone(),
                );
                Ok(Arc::new(gateway))
            }
            InferenceProvider::Azure => {
                let deployment = settings.azure_deployment.as_deref().ok_or_else(|| {
                    InferenceError::Configuration("Azure deployment name required".to_string())
                })?;
                let api_version = settings.azure_api_version.as_deref().ok_or_else(|| {
                    InferenceError::Configuration("Azure API version required".to_string())
                })?;
                let api_key = settings.api_key.clone().ok_or_else(|| {
                    InferenceError::Configuration("API key required for Azure OpenAI".to_string())
                })?;
                let gateway =
                    AzureInferenceGateway::new(&settings.base_url, deployment, api_key, api_version);
                Ok(Arc::new(gateway))
            }
        }
    }
}
