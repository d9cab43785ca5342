use std::io;
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use object_store::memory::InMemory;
use object_store::path::Path as StorePath;
use object_store::{MultipartUpload, ObjectStore, PutPayload};

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::StagingKey;

/// Process-local staging slot for uploads awaiting transcription.
pub struct MemoryStagingStore {
    inner: Arc<InMemory>,
    max_bytes: Option<u64>,
}

impl MemoryStagingStore {
    pub fn new(max_bytes: Option<u64>) -> Self {
        Self {
            inner: Arc::new(InMemory::new()),
            max_bytes,
        }
    }

    fn exceeds_limit(&self, size: u64) -> Option<u64> {
        self.max_bytes.filter(|limit| size > *limit)
    }
}

impl Default for MemoryStagingStore {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait::async_trait]
impl StagingStore for MemoryStagingStore {
    async fn store(
        &self,
        key: &StagingKey,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
        content_length: Option<u64>,
    ) -> Result<u64, StagingStoreError> {
        if let Some(limit) = content_length.and_then(|len| self.exceeds_limit(len)) {
            return Err(StagingStoreError::TooLarge { limit });
        }

        let store_path = StorePath::from(key.as_str());
        let mut upload = self
            .inner
            .put_multipart(&store_path)
            .await
            .map_err(|e| StagingStoreError::UploadFailed(e.to_string()))?;

        let mut total_bytes: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    let _ = upload.abort().await;
                    return Err(StagingStoreError::Io(e));
                }
            };
            total_bytes += bytes.len() as u64;
            if let Some(limit) = self.exceeds_limit(total_bytes) {
                let _ = upload.abort().await;
                return Err(StagingStoreError::TooLarge { limit });
            }
            if let Err(e) = upload.put_part(PutPayload::from(bytes)).await {
                let _ = upload.abort().await;
                return Err(StagingStoreError::UploadFailed(e.to_string()));
            }
        }

        upload
            .complete()
            .await
            .map_err(|e| StagingStoreError::UploadFailed(e.to_string()))?;

        tracing::debug!(key = %key, bytes = total_bytes, "Upload staged");

        Ok(total_bytes)
    }

    async fn fetch(&self, key: &StagingKey) -> Result<Bytes, StagingStoreError> {
        let store_path = StorePath::from(key.as_str());
        let result = self.inner.get(&store_path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StagingStoreError::NotFound(key.to_string()),
            other => StagingStoreError::DownloadFailed(other.to_string()),
        })?;

        result
            .bytes()
            .await
            .map_err(|e| StagingStoreError::DownloadFailed(e.to_string()))
    }

    async fn delete(&self, key: &StagingKey) -> Result<(), StagingStoreError> {
        let store_path = StorePath::from(key.as_str());
        self.inner
            .delete(&store_path)
            .await
            .map_err(|e| StagingStoreError::DeleteFailed(e.to_string()))
    }
}
