mod audio_clip;
mod batch_report;
mod dataset;
mod dataset_location;
mod index_document;
mod normalized_audio;
mod staging_key;
mod transcription_result;

pub use audio_clip::AudioClip;
pub use batch_report::{BatchReport, ItemError};
pub use dataset::{Dataset, DatasetRow, FILENAME_COLUMN, GENERATED_TEXT_COLUMN, is_missing};
pub use dataset_location::DatasetLocation;
pub use index_document::IndexDocument;
pub use normalized_audio::{NormalizedAudio, TARGET_SAMPLE_RATE};
pub use staging_key::StagingKey;
pub use transcription_result::TranscriptionResult;
