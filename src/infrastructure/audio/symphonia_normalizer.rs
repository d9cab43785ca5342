use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioNormalizer, DecodeError};
use crate::domain::{AudioClip, NormalizedAudio, TARGET_SAMPLE_RATE};

const RESAMPLER_CHUNK_SIZE: usize = 1024;
const MAX_FLUSH_CHUNKS: usize = 4;

/// Decodes any container/codec symphonia knows, downmixes to mono and
/// resamples to the target rate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaAudioNormalizer;

impl AudioNormalizer for SymphoniaAudioNormalizer {
    fn normalize(&self, clip: &AudioClip) -> Result<NormalizedAudio, DecodeError> {
        let (samples, source_rate) = decode_mono(clip)?;
        let samples = resample(&samples, source_rate, TARGET_SAMPLE_RATE)?;

        tracing::debug!(
            filename = %clip.filename,
            source_rate,
            samples = samples.len(),
            duration_secs = samples.len() as f64 / f64::from(TARGET_SAMPLE_RATE),
            "Audio normalized to 16kHz mono PCM"
        );

        Ok(NormalizedAudio::new(samples))
    }
}

fn decode_mono(clip: &AudioClip) -> Result<(Vec<f32>, u32), DecodeError> {
    let cursor = Cursor::new(clip.data.clone());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = clip.extension() {
        hint.with_extension(&ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| match e {
            SymphoniaError::Unsupported(what) => DecodeError::UnsupportedFormat(what.to_string()),
            other => DecodeError::DecodingFailed(format!("probe: {}", other)),
        })?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| DecodeError::DecodingFailed("no audio track found".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let source_rate = codec_params
        .sample_rate
        .ok_or_else(|| DecodeError::DecodingFailed("unknown sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| match e {
            SymphoniaError::Unsupported(what) => DecodeError::UnsupportedFormat(what.to_string()),
            other => DecodeError::DecodingFailed(format!("codec: {}", other)),
        })?;

    let mut mono: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(DecodeError::DecodingFailed(format!("packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(error = %e, filename = %clip.filename, "Skipping corrupt audio frame");
                continue;
            }
            Err(e) => {
                return Err(DecodeError::DecodingFailed(format!("decode: {}", e)));
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();
        if num_frames == 0 {
            continue;
        }
        let channels = spec.channels.count().max(1);

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let samples = sample_buf.samples();

        if channels > 1 {
            mono.extend(
                samples
                    .chunks(channels)
                    .map(|frame| frame.iter().sum::<f32>() / channels as f32),
            );
        } else {
            mono.extend_from_slice(samples);
        }
    }

    if mono.is_empty() {
        return Err(DecodeError::Empty);
    }

    Ok((mono, source_rate))
}

/// Sinc resampling of a mono signal. Returns the input untouched when the
/// rates already match; otherwise the output holds exactly
/// `len * to_rate / from_rate` samples.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, DecodeError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    if from_rate == 0 || to_rate == 0 {
        return Err(DecodeError::ResamplingFailed(format!(
            "invalid rates {} -> {}",
            from_rate, to_rate
        )));
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = f64::from(to_rate) / f64::from(from_rate);
    let expected_len = (samples.len() as u64 * u64::from(to_rate) / u64::from(from_rate)) as usize;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, RESAMPLER_CHUNK_SIZE, 1)
        .map_err(|e| DecodeError::ResamplingFailed(format!("init: {}", e)))?;

    let mut output = Vec::with_capacity(expected_len + RESAMPLER_CHUNK_SIZE);

    for chunk in samples.chunks(RESAMPLER_CHUNK_SIZE) {
        let mut input = chunk.to_vec();
        input.resize(RESAMPLER_CHUNK_SIZE, 0.0);

        let result = resampler
            .process(&[input], None)
            .map_err(|e| DecodeError::ResamplingFailed(e.to_string()))?;

        if let Some(channel) = result.first() {
            output.extend_from_slice(channel);
        }
    }

    // The sinc filter holds back the last half window of input; push zeros
    // through until every input frame has produced its output.
    let mut flushes = 0;
    while output.len() < expected_len && flushes < MAX_FLUSH_CHUNKS {
        let result = resampler
            .process_partial(None::<&[Vec<f32>]>, None)
            .map_err(|e| DecodeError::ResamplingFailed(format!("flush: {}", e)))?;

        match result.first() {
            Some(channel) if !channel.is_empty() => output.extend_from_slice(channel),
            _ => break,
        }
        flushes += 1;
    }

    output.resize(expected_len, 0.0);

    Ok(output)
}
