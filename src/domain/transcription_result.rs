#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionResult {
    transcript: String,
    duration_seconds: f64,
    source_filename: String,
}

impl TranscriptionResult {
    pub fn new(transcript: String, duration_seconds: f64, source_filename: String) -> Self {
        Self {
            transcript,
            duration_seconds,
            source_filename,
        }
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn source_filename(&self) -> &str {
        &self.source_filename
    }

    /// Duration in seconds with two decimal places, as reported on the wire.
    pub fn formatted_duration(&self) -> String {
        format!("{:.2}", self.duration_seconds)
    }
}
