mod batch_orchestrator;
mod indexing_pipeline;
mod transcription_service;

pub use batch_orchestrator::{BatchError, BatchOrchestrator, BatchOutcome};
pub use indexing_pipeline::{DEFAULT_BULK_CHUNK_SIZE, IndexingError, IndexingPipeline};
pub use transcription_service::{
    DEFAULT_INFERENCE_TIMEOUT, TranscriptionService, TranscriptionServiceError,
};
