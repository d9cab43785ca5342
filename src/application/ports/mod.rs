mod audio_normalizer;
mod dataset_store;
mod inference_gateway;
mod search_index;
mod staging_store;
mod transcription_client;

pub use audio_normalizer::{AudioNormalizer, DecodeError};
pub use dataset_store::{DatasetError, DatasetStore};
pub use inference_gateway::{InferenceError, InferenceGateway};
pub use search_index::{BulkItemFailure, BulkOutcome, SearchIndex, SearchIndexError};
pub use staging_store::{StagingStore, StagingStoreError};
pub use transcription_client::{RowError, TranscriptionClient};
