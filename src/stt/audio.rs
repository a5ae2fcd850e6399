//! Audio decoding utilities.
//!
//! This module turns an uploaded WAV file into the mono 16 kHz f32 sample
//! stream the whisper decoder expects: decode, downmix, then resample.

use hound::{SampleFormat, WavReader};
use std::io::Read;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::stt::types::WHISPER_SAMPLE_RATE;

/// Decode the WAV file at `path` into mono f32 samples at 16 kHz.
pub fn load_mono_16k(path: &Path) -> Result<Vec<f32>> {
    let reader = WavReader::open(path)
        .map_err(|e| AppError::Audio(format!("failed to read WAV file: {}", e)))?;
    let spec = reader.spec();

    if spec.channels == 0 {
        return Err(AppError::Audio("WAV file reports zero channels".to_string()));
    }
    if spec.sample_rate == 0 {
        return Err(AppError::Audio(
            "WAV file reports a zero sample rate".to_string(),
        ));
    }

    let interleaved = read_samples(reader)?;
    let mono = downmix_to_mono(interleaved, spec.channels);
    Ok(resample_linear(&mono, spec.sample_rate, WHISPER_SAMPLE_RATE))
}

/// Decode interleaved samples into f32 normalized to [-1.0, 1.0].
fn read_samples<R: Read>(reader: WavReader<R>) -> Result<Vec<f32>> {
    let spec = reader.spec();
    let collected: std::result::Result<Vec<f32>, hound::Error> =
        match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 16) => reader
                .into_samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect(),
            (SampleFormat::Int, 24) => reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 8_388_608.0))
                .collect(),
            (SampleFormat::Int, 32) => reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2_147_483_648.0))
                .collect(),
            (SampleFormat::Float, 32) => reader.into_samples::<f32>().collect(),
            (format, bits) => {
                return Err(AppError::Audio(format!(
                    "unsupported WAV encoding: {:?} {}-bit",
                    format, bits
                )))
            }
        };

    collected.map_err(|e| AppError::Audio(format!("failed to decode WAV samples: {}", e)))
}

/// Average interleaved channels down to a single mono stream.
fn downmix_to_mono(samples: Vec<f32>, channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples;
    }
    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Resample audio using linear interpolation.
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).round() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 * ratio;
        let index = src_pos as usize;
        let frac = (src_pos - index as f64) as f32;

        let current = samples[index.min(samples.len() - 1)];
        let next = samples[(index + 1).min(samples.len() - 1)];
        output.push(current + (next - current) * frac);
    }

    output
}

/// Get the length of audio in seconds.
pub fn audio_len(samples: &[f32]) -> f32 {
    samples.len() as f32 / WHISPER_SAMPLE_RATE as f32
}
