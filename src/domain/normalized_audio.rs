/// Sample rate every clip is normalized to before inference.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Mono waveform at [`TARGET_SAMPLE_RATE`].
///
/// The rate is not stored: a `NormalizedAudio` can only exist at the target
/// rate, so anything holding one can rely on it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAudio {
    samples: Vec<f32>,
}

impl NormalizedAudio {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        TARGET_SAMPLE_RATE
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / f64::from(TARGET_SAMPLE_RATE)
    }
}
