use std::sync::Arc;

use crate::application::ports::{DatasetError, DatasetStore, SearchIndex, SearchIndexError};
use crate::domain::{BatchReport, Dataset, DatasetLocation, IndexDocument, ItemError};

pub const DEFAULT_BULK_CHUNK_SIZE: usize = 500;

pub struct IndexingPipeline {
    index: Arc<dyn SearchIndex>,
    chunk_size: usize,
}

impl IndexingPipeline {
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        Self {
            index,
            chunk_size: DEFAULT_BULK_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub async fn index_dataset(
        &self,
        store: &dyn DatasetStore,
        location: &DatasetLocation,
    ) -> Result<BatchReport, IndexingError> {
        let dataset = store.load(location).await?;
        tracing::info!(source = %location, rows = dataset.len(), "Dataset loaded for indexing");
        self.run(&dataset).await
    }

    /// Indexes one document per row.
    ///
    /// Only an unusable backend is an `Err`; rejected documents and failed
    /// bulk calls end up in the returned report.
    #[tracing::instrument(skip(self, dataset), fields(index = %self.index.index_name(), rows = dataset.len()))]
    pub async fn run(&self, dataset: &Dataset) -> Result<BatchReport, IndexingError> {
        self.ensure_index().await?;

        let documents: Vec<IndexDocument> =
            dataset.rows().iter().map(IndexDocument::from_row).collect();

        let mut succeeded = 0;
        let mut errors = Vec::new();

        for (chunk_index, chunk) in documents.chunks(self.chunk_size).enumerate() {
            let offset = chunk_index * self.chunk_size;

            match self.index.bulk_insert(chunk).await {
                Ok(outcome) => {
                    succeeded += outcome.succeeded;
                    errors.extend(outcome.failures.into_iter().map(|failure| {
                        ItemError::new(
                            offset + failure.position,
                            format!("status_{}", failure.status),
                            failure.reason,
                        )
                    }));
                }
                Err(e) if e.is_fatal() => return Err(IndexingError::BackendUnreachable(e)),
                Err(e) => {
                    let detail = e.to_string();
                    errors.extend(
                        (0..chunk.len())
                            .map(|i| ItemError::new(offset + i, "bulk_write", detail.clone())),
                    );
                }
            }
        }

        let failed = errors.len();
        if failed > 0 {
            tracing::error!(failures = failed, "Bulk indexing failed with {} errors", failed);
            for error in &errors {
                tracing::error!(
                    position = error.position(),
                    kind = error.kind(),
                    detail = error.detail(),
                    "Document not indexed"
                );
            }
        }

        tracing::info!(
            succeeded,
            failed,
            "Indexed {} documents with {} failures",
            succeeded,
            failed
        );

        Ok(BatchReport::new(documents.len(), succeeded, failed, errors))
    }

    /// Creates the index when absent. Safe to call repeatedly.
    pub async fn ensure_index(&self) -> Result<(), IndexingError> {
        let exists = self
            .index
            .index_exists()
            .await
            .map_err(IndexingError::BackendUnreachable)?;

        if exists {
            tracing::debug!(index = %self.index.index_name(), "Index already exists");
            return Ok(());
        }

        match self.index.create_index().await {
            Ok(true) => tracing::info!(index = %self.index.index_name(), "Index created"),
            Ok(false) => tracing::debug!(index = %self.index.index_name(), "Index created concurrently"),
            Err(e) if e.is_fatal() => return Err(IndexingError::BackendUnreachable(e)),
            Err(e) => {
                tracing::warn!(error = %e, index = %self.index.index_name(), "Index creation failed, continuing with bulk write");
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IndexingError {
    #[error("indexing backend unreachable: {0}")]
    BackendUnreachable(SearchIndexError),
    #[error("dataset: {0}")]
    Dataset(#[from] DatasetError),
}
