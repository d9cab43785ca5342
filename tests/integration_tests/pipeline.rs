use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::net::TcpListener;

use transcript_pipeline::application::services::BatchOrchestrator;
use transcript_pipeline::domain::DatasetLocation;
use transcript_pipeline::infrastructure::dataset::ObjectStoreDatasetStore;
use transcript_pipeline::infrastructure::http::HttpTranscriptionClient;

use crate::support::{Gateway, build_wav, router};

#[tokio::test]
async fn given_running_service_when_batch_transcribing_then_augmented_csv_is_written() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        axum::serve(listener, router(Gateway::Echo, 1024 * 1024))
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    let dir = TempDir::new().unwrap();
    let audio = dir.path().join("audio");
    std::fs::create_dir_all(&audio).unwrap();
    std::fs::write(audio.join("one.wav"), build_wav(8_000, &vec![0i16; 8_000])).unwrap();
    std::fs::write(audio.join("three.wav"), build_wav(16_000, &vec![0i16; 1_600])).unwrap();
    let input = dir.path().join("manifest.csv");
    std::fs::write(&input, "filename,age\none.wav,30\ntwo.wav,40\nthree.wav,\n").unwrap();
    let output = dir.path().join("updated.csv");

    let client =
        HttpTranscriptionClient::new(format!("http://{}/asr", addr), Duration::from_secs(10))
            .unwrap();
    let report = BatchOrchestrator::new(Arc::new(client), &audio)
        .with_concurrency(2)
        .transcribe_dataset(
            &ObjectStoreDatasetStore::default(),
            &DatasetLocation::Local(input),
            &DatasetLocation::Local(output.clone()),
        )
        .await
        .unwrap();

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "filename,age,generated_text\n\
         one.wav,30,16000 samples\n\
         two.wav,40,\n\
         three.wav,,1600 samples\n"
    );
    shutdown_tx.send(()).ok();
}
