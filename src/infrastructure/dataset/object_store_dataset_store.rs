use std::sync::Arc;

use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{DatasetError, DatasetStore};
use crate::domain::{Dataset, DatasetLocation};

use super::csv_codec::{parse_csv, write_csv};

/// Reads and writes CSV manifests on local disk or in an S3-compatible bucket.
///
/// Credentials for the bucket case come from the usual `AWS_*` variables.
#[derive(Debug, Clone, Default)]
pub struct ObjectStoreDatasetStore {
    region: Option<String>,
    endpoint: Option<String>,
}

impl ObjectStoreDatasetStore {
    pub fn new(region: Option<String>, endpoint: Option<String>) -> Self {
        Self { region, endpoint }
    }

    fn resolve(
        &self,
        location: &DatasetLocation,
    ) -> Result<(Arc<dyn ObjectStore>, StorePath), DatasetError> {
        match location {
            DatasetLocation::Local(path) => {
                let absolute = std::path::absolute(path)
                    .map_err(|e| DatasetError::Storage(format!("{}: {}", path.display(), e)))?;
                let store_path = StorePath::from_absolute_path(&absolute)
                    .map_err(|e| DatasetError::Storage(e.to_string()))?;
                Ok((Arc::new(LocalFileSystem::new()), store_path))
            }
            DatasetLocation::ObjectStore { bucket, key } => {
                let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
                if let Some(region) = &self.region {
                    builder = builder.with_region(region);
                }
                if let Some(endpoint) = &self.endpoint {
                    builder = builder
                        .with_endpoint(endpoint)
                        .with_allow_http(endpoint.starts_with("http://"));
                }
                let store = builder
                    .build()
                    .map_err(|e| DatasetError::Storage(e.to_string()))?;
                Ok((Arc::new(store), StorePath::from(key.as_str())))
            }
        }
    }
}

#[async_trait]
impl DatasetStore for ObjectStoreDatasetStore {
    #[tracing::instrument(skip(self), fields(location = %location))]
    async fn load(&self, location: &DatasetLocation) -> Result<Dataset, DatasetError> {
        let (store, path) = self.resolve(location)?;

        let result = store.get(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => DatasetError::NotFound(location.to_string()),
            other => DatasetError::Storage(other.to_string()),
        })?;
        let bytes = result
            .bytes()
            .await
            .map_err(|e| DatasetError::Storage(e.to_string()))?;

        let dataset = parse_csv(&bytes)?;
        tracing::info!(rows = dataset.len(), columns = dataset.columns().len(), "Dataset loaded");
        Ok(dataset)
    }

    #[tracing::instrument(skip(self, dataset), fields(location = %location, rows = dataset.len()))]
    async fn save(&self, location: &DatasetLocation, dataset: &Dataset) -> Result<(), DatasetError> {
        let (store, path) = self.resolve(location)?;
        let bytes = write_csv(dataset)?;
        let size = bytes.len();

        store
            .put(&path, PutPayload::from(bytes))
            .await
            .map_err(|e| DatasetError::Storage(e.to_string()))?;

        tracing::info!(bytes = size, "Dataset written");
        Ok(())
    }
}
