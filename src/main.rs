use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use transcript_pipeline::application::ports::DatasetError;
use transcript_pipeline::application::services::{
    BatchOrchestrator, IndexingPipeline, TranscriptionService,
};
use transcript_pipeline::domain::{BatchReport, DatasetLocation};
use transcript_pipeline::infrastructure::audio::{InferenceGatewayFactory, SymphoniaAudioNormalizer};
use transcript_pipeline::infrastructure::dataset::ObjectStoreDatasetStore;
use transcript_pipeline::infrastructure::http::HttpTranscriptionClient;
use transcript_pipeline::infrastructure::observability::{TracingConfig, init_tracing};
use transcript_pipeline::infrastructure::search::ElasticsearchIndex;
use transcript_pipeline::infrastructure::storage::MemoryStagingStore;
use transcript_pipeline::presentation::config::DatasetSourceSettings;
use transcript_pipeline::presentation::{AppState, Environment, Settings, create_router};

/// Speech transcription service, batch transcriber and search indexer.
#[derive(Parser)]
#[command(name = "transcript-pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve `POST /asr` and `GET /ping`.
    Serve {
        /// Overrides `server.port`.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Transcribe every row of a CSV manifest through a running `/asr` endpoint.
    Transcribe {
        /// Input CSV path (overrides `batch.input`).
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output CSV path (overrides `batch.output`).
        #[arg(long)]
        output: Option<PathBuf>,

        /// Directory the `filename` column is relative to.
        #[arg(long)]
        audio_dir: Option<PathBuf>,

        /// Rows in flight at once.
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Bulk-load a transcribed CSV into the search index.
    Index {
        /// Source CSV path (overrides `indexing.source`).
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(
        environment.as_str(),
        &settings.logging,
    ));

    match cli.command {
        Command::Serve { port } => serve(settings, port).await,
        Command::Transcribe {
            input,
            output,
            audio_dir,
            concurrency,
        } => transcribe(settings, input, output, audio_dir, concurrency).await,
        Command::Index { input } => index(settings, input).await,
    }
}

fn location(
    override_path: Option<PathBuf>,
    configured: &DatasetSourceSettings,
) -> Result<DatasetLocation, DatasetError> {
    override_path
        .map(DatasetLocation::Local)
        .or_else(|| configured.location())
        .ok_or(DatasetError::SourceNotConfigured)
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight work");
            child.cancel();
        }
    });
    token
}

fn log_report(report: &BatchReport) {
    tracing::info!(
        attempted = report.attempted(),
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Run finished"
    );
}

async fn serve(settings: Settings, port: Option<u16>) -> anyhow::Result<()> {
    let transcription = &settings.transcription;
    let gateway = InferenceGatewayFactory::create(&transcription.inference)
        .context("failed to configure inference gateway")?;
    let staging_store = Arc::new(MemoryStagingStore::new(Some(
        transcription.max_upload_bytes(),
    )));

    let transcription_service = Arc::new(
        TranscriptionService::new(Arc::new(SymphoniaAudioNormalizer), gateway, staging_store)
            .with_inference_timeout(Duration::from_secs(transcription.inference_timeout_secs)),
    );

    let state = AppState {
        transcription_service,
        max_upload_bytes: transcription.max_upload_bytes(),
    };
    let router = create_router(state);

    let host: std::net::IpAddr = settings
        .server
        .host
        .parse()
        .context("invalid server.host")?;
    let addr = SocketAddr::new(host, port.unwrap_or(settings.server.port));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        address = %addr,
        provider = ?transcription.inference.provider,
        "Listening"
    );

    let shutdown = cancel_on_ctrl_c();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn transcribe(
    settings: Settings,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    audio_dir: Option<PathBuf>,
    concurrency: Option<usize>,
) -> anyhow::Result<()> {
    let batch = &settings.batch;
    let input = location(input, &batch.input)?;
    let output = location(output, &batch.output)?;

    let client = HttpTranscriptionClient::new(
        batch.asr_endpoint.clone(),
        Duration::from_secs(batch.request_timeout_secs),
    )?;
    let store = ObjectStoreDatasetStore::new(
        settings.object_store.region.clone(),
        settings.object_store.endpoint.clone(),
    );

    let orchestrator = BatchOrchestrator::new(
        Arc::new(client),
        audio_dir.unwrap_or_else(|| PathBuf::from(&batch.audio_dir)),
    )
    .with_concurrency(concurrency.unwrap_or(batch.concurrency))
    .with_retry(
        batch.retry_attempts,
        Duration::from_millis(batch.retry_backoff_ms),
    )
    .with_cancellation(cancel_on_ctrl_c());

    let report = orchestrator
        .transcribe_dataset(&store, &input, &output)
        .await?;
    log_report(&report);
    Ok(())
}

async fn index(settings: Settings, input: Option<PathBuf>) -> anyhow::Result<()> {
    let indexing = &settings.indexing;
    let source = location(input, &indexing.source)?;

    let search_index = ElasticsearchIndex::new(
        &indexing.host,
        indexing.index_name.clone(),
        indexing.username.clone(),
        indexing.password.clone(),
        indexing.verify_certs,
    )?;
    let store = ObjectStoreDatasetStore::new(
        settings.object_store.region.clone(),
        settings.object_store.endpoint.clone(),
    );

    let pipeline =
        IndexingPipeline::new(Arc::new(search_index)).with_chunk_size(indexing.bulk_chunk_size);

    let report = pipeline.index_dataset(&store, &source).await?;
    log_report(&report);
    Ok(())
}
