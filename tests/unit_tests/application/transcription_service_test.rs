use std::sync::Arc;
use std::time::Duration;

use transcript_pipeline::application::ports::{InferenceError, StagingStoreError};
use transcript_pipeline::application::services::{TranscriptionService, TranscriptionServiceError};
use transcript_pipeline::domain::AudioClip;
use transcript_pipeline::infrastructure::audio::SymphoniaAudioNormalizer;

use crate::support::{FixedNormalizer, MockGateway, TrackingStagingStore, build_wav};

fn service(gateway: Arc<MockGateway>, store: Arc<TrackingStagingStore>) -> TranscriptionService {
    TranscriptionService::new(Arc::new(SymphoniaAudioNormalizer), gateway, store)
}

#[tokio::test]
async fn given_two_second_8khz_wav_when_transcribing_then_gateway_gets_32000_samples_once() {
    let gateway = Arc::new(MockGateway::returning("hello world"));
    let store = Arc::new(TrackingStagingStore::new());
    let wav = build_wav(8_000, &vec![1000i16; 16_000]);

    let result = service(Arc::clone(&gateway), Arc::clone(&store))
        .transcribe(AudioClip::new("clip.wav", wav))
        .await
        .unwrap();

    assert_eq!(gateway.calls(), vec![32_000]);
    assert_eq!(result.transcript(), "hello world");
    assert_eq!(result.formatted_duration(), "2.00");
    assert_eq!(result.source_filename(), "clip.wav");
    assert_eq!(store.live_slots(), 0);
}

#[tokio::test]
async fn given_undecodable_upload_when_transcribing_then_decode_error_and_slot_released() {
    let gateway = Arc::new(MockGateway::returning("never"));
    let store = Arc::new(TrackingStagingStore::new());

    let result = service(Arc::clone(&gateway), Arc::clone(&store))
        .transcribe(AudioClip::new("notes.txt", b"this is plainly not audio".to_vec()))
        .await;

    assert!(matches!(result, Err(TranscriptionServiceError::Decode(_))));
    assert!(gateway.calls().is_empty());
    assert_eq!(store.deletes(), 1);
    assert_eq!(store.live_slots(), 0);
}

#[tokio::test]
async fn given_gateway_failure_when_transcribing_then_inference_error_and_slot_released() {
    let gateway = Arc::new(MockGateway::failing("model crashed"));
    let store = Arc::new(TrackingStagingStore::new());
    let wav = build_wav(16_000, &vec![0i16; 1_600]);

    let result = service(gateway, Arc::clone(&store))
        .transcribe(AudioClip::new("clip.wav", wav))
        .await;

    assert!(matches!(
        result,
        Err(TranscriptionServiceError::Inference(InferenceError::RequestFailed(_)))
    ));
    assert_eq!(store.live_slots(), 0);
}

#[tokio::test]
async fn given_slow_gateway_when_timeout_elapses_then_inference_timeout() {
    let gateway = Arc::new(MockGateway::returning("late").with_delay(Duration::from_secs(5)));
    let store = Arc::new(TrackingStagingStore::new());
    let wav = build_wav(16_000, &vec![0i16; 1_600]);

    let result = service(gateway, Arc::clone(&store))
        .with_inference_timeout(Duration::from_millis(50))
        .transcribe(AudioClip::new("clip.wav", wav))
        .await;

    assert!(matches!(
        result,
        Err(TranscriptionServiceError::Inference(InferenceError::Timeout(_)))
    ));
    assert_eq!(store.live_slots(), 0);
}

#[tokio::test]
async fn given_failing_release_when_transcription_succeeds_then_result_is_still_returned() {
    let gateway = Arc::new(MockGateway::returning("kept"));
    let store = Arc::new(TrackingStagingStore::failing_delete());
    let wav = build_wav(16_000, &vec![0i16; 1_600]);

    let result = service(gateway, Arc::clone(&store))
        .transcribe(AudioClip::new("clip.wav", wav))
        .await
        .unwrap();

    assert_eq!(result.transcript(), "kept");
    assert_eq!(store.deletes(), 1);
}

#[tokio::test]
async fn given_upload_over_limit_when_transcribing_then_too_large_and_no_inference() {
    let gateway = Arc::new(MockGateway::returning("never"));
    let store = Arc::new(TrackingStagingStore::with_limit(10));

    let result = TranscriptionService::new(Arc::new(FixedNormalizer(16_000)), gateway.clone(), store)
        .transcribe(AudioClip::new("big.wav", vec![0u8; 64]))
        .await;

    assert!(matches!(
        result,
        Err(TranscriptionServiceError::Staging(StagingStoreError::TooLarge { limit: 10 }))
    ));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn given_concurrent_uploads_with_same_name_when_transcribing_then_each_gets_own_result() {
    let gateway = Arc::new(MockGateway::returning("ok"));
    let store = Arc::new(TrackingStagingStore::new());
    let service = Arc::new(service(Arc::clone(&gateway), Arc::clone(&store)));

    let short = build_wav(16_000, &vec![0i16; 16_000]);
    let long = build_wav(16_000, &vec![0i16; 32_000]);

    let (a, b) = tokio::join!(
        service.transcribe(AudioClip::new("same.wav", short)),
        service.transcribe(AudioClip::new("same.wav", long)),
    );

    assert_eq!(a.unwrap().formatted_duration(), "1.00");
    assert_eq!(b.unwrap().formatted_duration(), "2.00");
    assert_eq!(store.live_slots(), 0);
}
