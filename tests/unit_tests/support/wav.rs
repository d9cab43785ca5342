pub fn build_wav(sample_rate: u32, samples: &[i16]) -> Vec<u8> {
    build_pcm_wav(sample_rate, 1, samples)
}

/// `frames` holds (left, right) pairs.
pub fn build_stereo_wav(sample_rate: u32, frames: &[(i16, i16)]) -> Vec<u8> {
    let interleaved: Vec<i16> = frames.iter().flat_map(|&(l, r)| [l, r]).collect();
    build_pcm_wav(sample_rate, 2, &interleaved)
}

fn build_pcm_wav(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
    let block_align = channels * 2;
    let byte_rate = sample_rate * u32::from(block_align);
    let data_size = samples.len() as u32 * 2;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&file_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        wav.extend_from_slice(&s.to_le_bytes());
    }
    wav
}
