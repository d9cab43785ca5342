use std::io;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::StagingKey;

/// Short-lived storage for an upload while it is being transcribed.
#[async_trait::async_trait]
pub trait StagingStore: Send + Sync {
    async fn store(
        &self,
        key: &StagingKey,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
        content_length: Option<u64>,
    ) -> Result<u64, StagingStoreError>;

    async fn fetch(&self, key: &StagingKey) -> Result<Bytes, StagingStoreError>;

    async fn delete(&self, key: &StagingKey) -> Result<(), StagingStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StagingStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("upload exceeds limit of {limit} bytes")]
    TooLarge { limit: u64 },
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
