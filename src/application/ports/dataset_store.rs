use async_trait::async_trait;

use crate::domain::{Dataset, DatasetLocation};

#[async_trait]
pub trait DatasetStore: Send + Sync {
    async fn load(&self, location: &DatasetLocation) -> Result<Dataset, DatasetError>;

    /// Writes the whole dataset in one shot, replacing any previous artifact.
    async fn save(&self, location: &DatasetLocation, dataset: &Dataset)
    -> Result<(), DatasetError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("no valid source for dataset provided")]
    SourceNotConfigured,
    #[error("dataset not found: {0}")]
    NotFound(String),
    #[error("dataset storage error: {0}")]
    Storage(String),
    #[error("malformed dataset: {0}")]
    Malformed(String),
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),
}
