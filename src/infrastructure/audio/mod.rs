mod azure_inference_gateway;
mod inference_gateway_factory;
mod openai_inference_gateway;
mod symphonia_normalizer;
pub mod wav;

pub use azure_inference_gateway::AzureInferenceGateway;
pub use inference_gateway_factory::InferenceGatewayFactory;
pub use openai_inference_gateway::OpenAiInferenceGateway;
pub use symphonia_normalizer::{SymphoniaAudioNormalizer, resample};
