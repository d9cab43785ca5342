use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;

use transcript_pipeline::application::ports::{InferenceError, InferenceGateway};
use transcript_pipeline::application::services::TranscriptionService;
use transcript_pipeline::domain::NormalizedAudio;
use transcript_pipeline::infrastructure::audio::SymphoniaAudioNormalizer;
use transcript_pipeline::infrastructure::storage::MemoryStagingStore;
use transcript_pipeline::presentation::{AppState, create_router};

pub const BOUNDARY: &str = "X-TEST-BOUNDARY";

/// Echoes the sample count so callers can tell which upload produced a reply.
pub enum Gateway {
    Echo,
    Fails,
    Hangs,
}

#[async_trait]
impl InferenceGateway for Gateway {
    async fn transcribe(&self, audio: &NormalizedAudio) -> Result<String, InferenceError> {
        match self {
            Gateway::Echo => Ok(format!("{} samples", audio.len())),
            Gateway::Fails => Err(InferenceError::RequestFailed("status 503".to_string())),
            Gateway::Hangs => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(String::new())
            }
        }
    }
}

pub fn router(gateway: Gateway, max_upload_bytes: u64) -> Router {
    let service = TranscriptionService::new(
        Arc::new(SymphoniaAudioNormalizer),
        Arc::new(gateway),
        Arc::new(MemoryStagingStore::new(Some(max_upload_bytes))),
    )
    .with_inference_timeout(Duration::from_millis(200));

    create_router(AppState {
        transcription_service: Arc::new(service),
        max_upload_bytes,
    })
}

pub fn multipart_body(field: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn build_wav(sample_rate: u32, samples: &[i16]) -> Vec<u8> {
    let num_samples = samples.len() as u32;
    let byte_rate = sample_rate * 2;
    let data_size = num_samples * 2;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&file_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        wav.extend_from_slice(&s.to_le_bytes());
    }
    wav
}
