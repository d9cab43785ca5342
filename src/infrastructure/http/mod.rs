mod asr_client;

pub use asr_client::HttpTranscriptionClient;
