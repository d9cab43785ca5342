use async_trait::async_trait;

use crate::domain::IndexDocument;

/// The fixed, named index transcripts are written to.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    fn index_name(&self) -> &str;

    async fn index_exists(&self) -> Result<bool, SearchIndexError>;

    /// Returns `false` when the index already existed.
    async fn create_index(&self) -> Result<bool, SearchIndexError>;

    async fn bulk_insert(
        &self,
        documents: &[IndexDocument],
    ) -> Result<BulkOutcome, SearchIndexError>;
}

/// Per-call bulk accounting as reported by the backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BulkOutcome {
    pub succeeded: usize,
    pub failures: Vec<BulkItemFailure>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemFailure {
    /// Position of the document within the submitted slice.
    pub position: usize,
    pub status: u16,
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchIndexError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    #[error("backend rejected credentials: {0}")]
    Unauthorized(String),
    #[error("index creation failed: {0}")]
    IndexCreationFailed(String),
    #[error("bulk write failed: {0}")]
    BulkWriteFailed(String),
}

impl SearchIndexError {
    /// Whether the backend cannot be used at all.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unreachable(_) | Self::Unauthorized(_))
    }
}
