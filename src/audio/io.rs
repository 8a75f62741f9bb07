//! Audio file I/O
//!
//! Decodes looping WAV assets into mono f32 at the render rate, and writes
//! rendered session mixdowns back to WAV.
//! Sample rate conversion uses linear interpolation.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{AmbientError, Result};

/// Default render rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Supported source and render rates in Hz
pub const MIN_SAMPLE_RATE: u32 = 8000;
pub const MAX_SAMPLE_RATE: u32 = 192000;

/// Longest loop accepted, so a decoded track stays a bounded allocation
pub const MAX_LOOP_SECS: f64 = 10.0 * 60.0;

/// Decode a WAV file into mono samples at `target_rate`
///
/// Stereo input is averaged down to mono.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a valid WAV file
/// * `UnsupportedFormat` - More than 2 channels, an odd bit depth, or a
///   sample rate outside `MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE`
/// * `InvalidAudio` - Longer than `MAX_LOOP_SECS`
/// * `EmptyAudio` - If the file holds no frames
pub fn decode_loop(path: &Path, target_rate: u32) -> Result<Vec<f32>> {
    if !path.exists() {
        return Err(AmbientError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let reader = WavReader::open(path).map_err(|e| AmbientError::InvalidAudio {
        reason: format!("Failed to open WAV file: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    let channels = spec.channels as usize;

    if channels == 0 || channels > 2 {
        return Err(AmbientError::UnsupportedFormat {
            format: format!("{}-channel audio (only mono/stereo supported)", channels),
        });
    }

    check_loop_bounds(spec.sample_rate, reader.duration(), target_rate)?;

    let interleaved = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
    let mono = downmix(&interleaved, channels);

    if mono.is_empty() {
        return Err(AmbientError::EmptyAudio);
    }

    if spec.sample_rate != target_rate {
        let ratio = target_rate as f64 / spec.sample_rate as f64;
        Ok(resample_linear(&mono, ratio))
    } else {
        Ok(mono)
    }
}

/// Streams rendered mono blocks into a 16-bit WAV file
pub struct MixdownWriter {
    writer: WavWriter<BufWriter<File>>,
    samples_written: u64,
}

impl MixdownWriter {
    pub fn create(path: &Path, sample_rate: u32) -> Result<Self> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let writer = WavWriter::create(path, spec).map_err(hound_to_io)?;
        Ok(Self {
            writer,
            samples_written: 0,
        })
    }

    /// Append a block, clipping to full scale
    pub fn write_block(&mut self, block: &[f32]) -> Result<()> {
        for sample in block {
            let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            self.writer.write_sample(scaled).map_err(hound_to_io)?;
        }
        self.samples_written += block.len() as u64;
        Ok(())
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Flush and fix up the WAV header
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().map_err(hound_to_io)
    }
}

/// Write mono samples to a 16-bit WAV file
pub fn write_mixdown(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let mut writer = MixdownWriter::create(path, sample_rate)?;
    writer.write_block(samples)?;
    writer.finalize()
}

fn hound_to_io(e: hound::Error) -> AmbientError {
    match e {
        hound::Error::IoError(io) => AmbientError::Io(io),
        other => AmbientError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            other.to_string(),
        )),
    }
}

// ============================================================================
// Internal helper functions
// ============================================================================

/// Reject rates and lengths whose decoded loop would be unreasonably large
///
/// Checked against the header before any sample is read.
fn check_loop_bounds(source_rate: u32, frames: u32, target_rate: u32) -> Result<()> {
    for rate in [source_rate, target_rate] {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&rate) {
            return Err(AmbientError::UnsupportedFormat {
                format: format!(
                    "{} Hz audio (supported: {}-{} Hz)",
                    rate, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
                ),
            });
        }
    }

    let duration_secs = frames as f64 / source_rate as f64;
    if duration_secs > MAX_LOOP_SECS {
        return Err(AmbientError::InvalidAudio {
            reason: format!(
                "Loop is {:.1}s long, longer than the {:.0}s limit",
                duration_secs, MAX_LOOP_SECS
            ),
            source: None,
        });
    }
    Ok(())
}

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    fn invalid(bits: &str, e: hound::Error) -> AmbientError {
        AmbientError::InvalidAudio {
            reason: format!("Failed to read {} samples: {}", bits, e),
            source: Some(Box::new(e)),
        }
    }

    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| invalid("float", e)),
        SampleFormat::Int => match bits_per_sample {
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|v| v as f32 / 128.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| invalid("8-bit", e)),
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| invalid("16-bit", e)),
            // 24-bit stored as i32 in hound
            24 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 8388608.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| invalid("24-bit", e)),
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2147483648.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| invalid("32-bit int", e)),
            _ => Err(AmbientError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits_per_sample),
            }),
        },
    }
}

/// Average interleaved frames down to one channel
fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Linear interpolation resampling
fn resample_linear(samples: &[f32], ratio: f64) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let source_len = samples.len();
    let target_len = ((source_len as f64) * ratio).ceil() as usize;

    (0..target_len)
        .map(|i| {
            let src_pos = i as f64 / ratio;
            let src_idx = src_pos.floor() as usize;
            let frac = (src_pos - src_idx as f64) as f32;

            if src_idx + 1 < source_len {
                samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac
            } else if src_idx < source_len {
                samples[src_idx]
            } else {
                0.0
            }
        })
        .collect()
}
