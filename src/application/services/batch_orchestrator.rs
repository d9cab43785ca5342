use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{DatasetError, DatasetStore, RowError, TranscriptionClient};
use crate::domain::{
    AudioClip, BatchReport, Dataset, DatasetLocation, DatasetRow, FILENAME_COLUMN, ItemError,
};

const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct BatchOutcome {
    pub dataset: Dataset,
    pub report: BatchReport,
}

enum RowOutcome {
    Transcribed(String),
    Failed(RowError),
    Skipped,
}

/// Runs every dataset row through the transcription endpoint.
///
/// A failing row gets a `None` transcript and an entry in the report; it never
/// stops the batch. Rows may complete out of order but the output keeps the
/// input order.
pub struct BatchOrchestrator {
    client: Arc<dyn TranscriptionClient>,
    audio_root: PathBuf,
    concurrency: usize,
    retry_attempts: u32,
    retry_backoff: Duration,
    cancellation: CancellationToken,
}

impl BatchOrchestrator {
    pub fn new(client: Arc<dyn TranscriptionClient>, audio_root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            audio_root: audio_root.into(),
            concurrency: 1,
            retry_attempts: 0,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Extra attempts for transient failures. Zero keeps one call per row.
    pub fn with_retry(mut self, attempts: u32, backoff: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_backoff = backoff;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Loads the manifest, transcribes it and writes the augmented copy once
    /// all rows are done.
    pub async fn transcribe_dataset(
        &self,
        store: &dyn DatasetStore,
        input: &DatasetLocation,
        output: &DatasetLocation,
    ) -> Result<BatchReport, BatchError> {
        let dataset = store.load(input).await?;
        tracing::info!(source = %input, rows = dataset.len(), "Dataset loaded");

        let outcome = self.run(dataset).await?;

        store.save(output, &outcome.dataset).await?;
        tracing::info!(destination = %output, rows = outcome.dataset.len(), "Augmented dataset written");

        Ok(outcome.report)
    }

    pub async fn run(&self, dataset: Dataset) -> Result<BatchOutcome, BatchError> {
        if !dataset.has_column(FILENAME_COLUMN) {
            return Err(DatasetError::MissingColumn(FILENAME_COLUMN.to_string()).into());
        }

        let total = dataset.len();
        tracing::info!(
            rows = total,
            concurrency = self.concurrency,
            retry_attempts = self.retry_attempts,
            "Starting batch transcription"
        );

        let outcomes: Vec<RowOutcome> = stream::iter(dataset.rows().iter().enumerate())
            .map(|(position, row)| self.process_row(position, row))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut rows = Vec::with_capacity(total);
        let mut errors = Vec::new();
        let mut succeeded = 0;
        let mut skipped = 0;

        for (position, (row, outcome)) in dataset.rows().iter().zip(outcomes).enumerate() {
            let generated_text = match outcome {
                RowOutcome::Transcribed(text) => {
                    succeeded += 1;
                    Some(text)
                }
                RowOutcome::Failed(e) => {
                    errors.push(ItemError::new(position, e.kind(), e.to_string()));
                    None
                }
                RowOutcome::Skipped => {
                    skipped += 1;
                    None
                }
            };
            rows.push(row.clone().with_generated_text(generated_text));
        }

        let failed = errors.len();
        let report = BatchReport::new(succeeded + failed, succeeded, failed, errors);

        tracing::info!(
            attempted = report.attempted(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped,
            "Batch transcription finished"
        );

        if skipped > 0 {
            return Err(BatchError::Cancelled { report, total });
        }

        Ok(BatchOutcome {
            dataset: dataset.with_rows(rows),
            report,
        })
    }

    async fn process_row(&self, position: usize, row: &DatasetRow) -> RowOutcome {
        if self.cancellation.is_cancelled() {
            return RowOutcome::Skipped;
        }

        let filename = row.filename().unwrap_or_default();

        match self.transcribe_row(row).await {
            Ok(text) => {
                tracing::debug!(row = position, filename, "Row transcribed");
                RowOutcome::Transcribed(text)
            }
            Err(e) => {
                tracing::warn!(
                    row = position,
                    filename,
                    kind = e.kind(),
                    error = %e,
                    "Row transcription failed"
                );
                RowOutcome::Failed(e)
            }
        }
    }

    async fn transcribe_row(&self, row: &DatasetRow) -> Result<String, RowError> {
        let filename = row.filename().ok_or(RowError::MissingFilename)?;
        let clip = read_clip(&self.audio_root.join(filename)).await?;

        let mut attempt = 0;
        loop {
            match self.client.transcribe(clip.clone()).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < self.retry_attempts => {
                    attempt += 1;
                    tracing::debug!(filename, attempt, error = %e, "Retrying transcription");
                    tokio::time::sleep(self.retry_backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

async fn read_clip(path: &Path) -> Result<AudioClip, RowError> {
    let data = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => RowError::FileNotFound(path.to_path_buf()),
        _ => RowError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("audio")
        .to_string();

    Ok(AudioClip::new(filename, data))
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("dataset: {0}")]
    Dataset(#[from] DatasetError),
    #[error("batch cancelled: {} of {total} rows attempted", .report.attempted())]
    Cancelled { report: BatchReport, total: usize },
}
