//! WAV file reading and writing.

use crate::{IoError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use tracing::debug;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = reader.len() as u64; // total across all channels
    if spec.channels == 0 {
        return Err(IoError::NoChannels);
    }
    let num_frames = total_samples / spec.channels as u64;

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs: num_frames as f64 / spec.sample_rate as f64,
        format: match spec.sample_format {
            SampleFormat::Float => WavFormat::IeeeFloat,
            SampleFormat::Int => WavFormat::Pcm,
        },
    })
}

/// Read a WAV file as normalized mono samples in [-1, 1].
///
/// Multi-channel files are mixed down by averaging the channels of each
/// frame. Returns the samples and the sample rate.
pub fn read_wav_mono<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, u32)> {
    let path = path.as_ref();
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(IoError::NoChannels);
    }

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Int, bits @ (8 | 16 | 24 | 32)) => {
            let scale = 1.0 / (1_i64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()?
        }
        (_, bits) => return Err(IoError::UnsupportedBitDepth(bits)),
    };

    let channels = spec.channels as usize;
    let samples: Vec<f32> = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    debug!(
        path = %path.display(),
        frames = samples.len(),
        sample_rate = spec.sample_rate,
        channels,
        "loaded WAV"
    );

    Ok((samples, spec.sample_rate))
}

/// Write mono samples as a 32-bit float WAV file.
pub fn write_wav_mono<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> Result<()> {
    let path = path.as_ref();
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    debug!(
        path = %path.display(),
        frames = samples.len(),
        sample_rate,
        "wrote WAV"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_wav_path(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
        dir.path().join(name)
    }

    #[test]
    fn float_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_wav_path(&dir, "roundtrip.wav");

        let samples: Vec<f32> = (0..4410).map(|i| (i as f32 * 0.01).sin() * 0.5).collect();
        write_wav_mono(&path, &samples, 44100).unwrap();

        let (back, sample_rate) = read_wav_mono(&path).unwrap();
        assert_eq!(sample_rate, 44100);
        assert_eq!(back, samples);
    }

    #[test]
    fn info_reports_header_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_wav_path(&dir, "info.wav");

        write_wav_mono(&path, &vec![0.0; 22050], 44100).unwrap();

        let info = read_wav_info(&path).unwrap();
        assert_eq!(info.channels, 1);
        assert_eq!(info.sample_rate, 44100);
        assert_eq!(info.num_frames, 22050);
        assert_eq!(info.format, WavFormat::IeeeFloat);
        assert!((info.duration_secs - 0.5).abs() < 1e-9);
    }

    #[test]
    fn pcm_16_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_wav_path(&dir, "pcm16.wav");

        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for v in [0_i16, i16::MAX, i16::MIN, 16384] {
            writer.write_sample(v).unwrap();
        }
        writer.finalize().unwrap();

        let (samples, _) = read_wav_mono(&path).unwrap();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], 0.0);
        assert!((samples[1] - 1.0).abs() < 1e-3);
        assert!((samples[2] - -1.0).abs() < 1e-3);
        assert!((samples[3] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn stereo_mixes_down_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_wav_path(&dir, "stereo.wav");

        let spec = WavSpec {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        // L = 1.0, R = 0.0 in every frame -> mono 0.5
        for _ in 0..100 {
            writer.write_sample(1.0_f32).unwrap();
            writer.write_sample(0.0_f32).unwrap();
        }
        writer.finalize().unwrap();

        let (samples, sample_rate) = read_wav_mono(&path).unwrap();
        assert_eq!(sample_rate, 48000);
        assert_eq!(samples.len(), 100);
        assert!(samples.iter().all(|&s| (s - 0.5).abs() < 1e-6));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_wav_mono("/nonexistent/nope.wav").is_err());
    }
}
