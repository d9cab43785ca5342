use std::io;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream;

use transcript_pipeline::application::ports::{StagingStore, StagingStoreError};
use transcript_pipeline::domain::StagingKey;
use transcript_pipeline::infrastructure::storage::MemoryStagingStore;

fn chunks(parts: &[&'static [u8]]) -> futures::stream::BoxStream<'static, Result<Bytes, io::Error>> {
    stream::iter(
        parts
            .iter()
            .map(|p| Ok(Bytes::from_static(p)))
            .collect::<Vec<_>>(),
    )
    .boxed()
}

#[tokio::test]
async fn given_chunked_upload_when_storing_then_fetch_returns_concatenated_bytes() {
    let store = MemoryStagingStore::default();
    let key = StagingKey::for_upload("a.wav");

    let written = store
        .store(&key, chunks(&[b"hello ", b"world"]), None)
        .await
        .unwrap();

    assert_eq!(written, 11);
    assert_eq!(store.fetch(&key).await.unwrap(), Bytes::from_static(b"hello world"));
}

#[tokio::test]
async fn given_deleted_slot_when_fetching_then_not_found() {
    let store = MemoryStagingStore::default();
    let key = StagingKey::for_upload("a.wav");
    store.store(&key, chunks(&[b"data"]), None).await.unwrap();

    store.delete(&key).await.unwrap();

    assert!(matches!(
        store.fetch(&key).await,
        Err(StagingStoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn given_stream_exceeding_limit_when_storing_then_too_large_and_nothing_kept() {
    let store = MemoryStagingStore::new(Some(8));
    let key = StagingKey::for_upload("a.wav");

    let result = store.store(&key, chunks(&[b"12345", b"67890"]), None).await;

    assert!(matches!(result, Err(StagingStoreError::TooLarge { limit: 8 })));
    assert!(store.fetch(&key).await.is_err());
}

#[tokio::test]
async fn given_declared_length_over_limit_when_storing_then_rejected_up_front() {
    let store = MemoryStagingStore::new(Some(8));
    let key = StagingKey::for_upload("a.wav");

    let result = store.store(&key, chunks(&[b"1"]), Some(1_000)).await;

    assert!(matches!(result, Err(StagingStoreError::TooLarge { .. })));
}

#[tokio::test]
async fn given_stream_error_when_storing_then_io_error() {
    let store = MemoryStagingStore::default();
    let key = StagingKey::for_upload("a.wav");
    let failing = stream::iter(vec![
        Ok(Bytes::from_static(b"partial")),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away")),
    ])
    .boxed();

    let result = store.store(&key, failing, None).await;

    assert!(matches!(result, Err(StagingStoreError::Io(_))));
}
