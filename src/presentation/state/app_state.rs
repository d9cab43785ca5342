use std::sync::Arc;

use crate::application::services::TranscriptionService;

#[derive(Clone)]
pub struct AppState {
    pub transcription_service: Arc<TranscriptionService>,
    pub max_upload_bytes: u64,
}
