use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};
use reqwest::multipart;

use crate::application::ports::InferenceError;
use crate::domain::NormalizedAudio;

/// Encodes normalized audio as 16-bit PCM mono WAV.
pub fn encode_wav(audio: &NormalizedAudio) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + audio.len() * 2));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &sample in audio.samples() {
            let clamped = sample.clamp(-1.0, 1.0);
            writer.write_sample((clamped * f32::from(i16::MAX)) as i16)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

pub(crate) fn wav_part(audio: &NormalizedAudio) -> Result<multipart::Part, InferenceError> {
    let wav = encode_wav(audio)
        .map_err(|e| InferenceError::RequestFailed(format!("wav encoding: {}", e)))?;

    multipart::Part::bytes(wav)
        .file_name("audio.wav")
        .mime_str("audio/wav")
        .map_err(|e| InferenceError::RequestFailed(format!("mime: {}", e)))
}
