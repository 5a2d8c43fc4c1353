use crate::{NatterError, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Encode audio samples as 16-bit PCM WAV bytes
///
/// # Arguments
/// * `samples` - Audio samples (f32, range -1.0 to 1.0)
/// * `sample_rate` - Sample rate in Hz
/// * `channels` - Number of channels
pub fn encode_wav(samples: &[f32], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec)
        .map_err(|e| NatterError::AudioProcessingError(format!("Failed to create WAV writer: {}", e)))?;

    // Convert f32 samples to i16
    for &sample in samples {
        let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(sample_i16)
            .map_err(|e| NatterError::AudioProcessingError(format!("Failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| NatterError::AudioProcessingError(format!("Failed to finalize WAV data: {}", e)))?;

    Ok(cursor.into_inner())
}

/// Average interleaved frames down to a single channel
///
/// Passes mono input through untouched.
pub fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
