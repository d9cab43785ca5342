use config::{Config, ConfigError, File};
use secrecy::SecretString;
use serde::Deserialize;

use super::Environment;
use crate::domain::DatasetLocation;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub transcription: TranscriptionSettings,
    pub batch: BatchSettings,
    pub indexing: IndexingSettings,
    #[serde(default)]
    pub object_store: ObjectStoreSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub inference: InferenceSettings,
    pub inference_timeout_secs: u64,
    pub max_upload_mb: u64,
}

impl TranscriptionSettings {
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceSettings {
    pub provider: InferenceProvider,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<SecretString>,
    pub azure_deployment: Option<String>,
    pub azure_api_version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferenceProvider {
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchSettings {
    pub asr_endpoint: String,
    pub audio_dir: String,
    #[serde(default)]
    pub input: DatasetSourceSettings,
    #[serde(default)]
    pub output: DatasetSourceSettings,
    pub concurrency: usize,
    pub request_timeout_secs: u64,
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetSourceSettings {
    pub path: Option<String>,
    pub bucket: Option<String>,
    pub key: Option<String>,
}

impl DatasetSourceSettings {
    pub fn location(&self) -> Option<DatasetLocation> {
        DatasetLocation::resolve(
            self.path.as_deref(),
            self.bucket.as_deref(),
            self.key.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexingSettings {
    pub host: String,
    pub username: String,
    pub password: Option<SecretString>,
    pub index_name: String,
    pub verify_certs: bool,
    pub bulk_chunk_size: usize,
    #[serde(default)]
    pub source: DatasetSourceSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectStoreSettings {
    pub region: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Settings {
    /// Layers defaults, `appsettings.<env>.toml` and `APP_*` variables.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8001)?
            .set_default("transcription.inference.provider", "openai")?
            .set_default("transcription.inference.base_url", "http://localhost:8080/v1")?
            .set_default("transcription.inference.model", "whisper-1")?
            .set_default("transcription.inference_timeout_secs", 120)?
            .set_default("transcription.max_upload_mb", 50)?
            .set_default("batch.asr_endpoint", "http://localhost:8001/asr")?
            .set_default("batch.audio_dir", "data/common_voice/cv-valid-dev")?
            .set_default("batch.input.path", "data/common_voice/cv-valid-dev.csv")?
            .set_default("batch.output.path", "data/common_voice/updated_cv-valid-dev.csv")?
            .set_default("batch.concurrency", 4)?
            .set_default("batch.request_timeout_secs", 60)?
            .set_default("batch.retry_attempts", 0)?
            .set_default("batch.retry_backoff_ms", 500)?
            .set_default("indexing.host", "http://localhost:9200")?
            .set_default("indexing.username", "elastic")?
            .set_default("indexing.index_name", "cv-transcriptions")?
            .set_default("indexing.verify_certs", true)?
            .set_default("indexing.bulk_chunk_size", 500)?
            .set_default("indexing.source.path", "data/common_voice/updated_cv-valid-dev.csv")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str().to_lowercase()))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
