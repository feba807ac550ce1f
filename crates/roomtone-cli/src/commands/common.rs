//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use roomtone_analysis::SpectrumAnalyzer;
use roomtone_config::{default_config_path, AnalysisConfig};
use roomtone_core::frequency_to_note;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Load the analysis configuration.
///
/// An explicit `--config` path must exist and parse; otherwise the default
/// `roomtone.toml` is used when present, and built-in defaults when not.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
    if let Some(path) = path {
        return AnalysisConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()));
    }

    let default = default_config_path();
    if default.exists() {
        info!(path = %default.display(), "using user config");
        return AnalysisConfig::load(&default)
            .with_context(|| format!("loading config {}", default.display()));
    }

    Ok(AnalysisConfig::default())
}

/// Load a WAV file as mono samples, warning when the file's sample rate
/// differs from the configured one (the file's rate wins).
pub fn load_mono(path: &Path, config: &AnalysisConfig) -> anyhow::Result<(Vec<f32>, f32)> {
    let (samples, sample_rate) = roomtone_io::read_wav_mono(path)
        .with_context(|| format!("reading {}", path.display()))?;

    if sample_rate != config.sample_rate {
        warn!(
            file = sample_rate,
            configured = config.sample_rate,
            "sample rate differs from configuration; using the file's rate"
        );
    }

    println!(
        "  {} samples, {} Hz, {:.2}s",
        samples.len(),
        sample_rate,
        samples.len() as f32 / sample_rate as f32
    );

    Ok((samples, sample_rate as f32))
}

/// Compute one dB frame per non-overlapping block, with a progress bar for
/// long recordings.
pub fn spectral_frames(analyzer: &SpectrumAnalyzer, samples: &[f32]) -> Vec<Vec<f32>> {
    let blocks = samples.chunks_exact(analyzer.fft_size());
    let pb = ProgressBar::new(blocks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames")
            .unwrap()
            .progress_chars("##-"),
    );

    let frames = blocks
        .map(|block| {
            pb.inc(1);
            analyzer.db_frame(block)
        })
        .collect();
    pb.finish_and_clear();
    frames
}

/// Write a result value object as pretty JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Report written to {}", path.display());
    Ok(())
}

/// Human-readable note label for a frequency, e.g. `A3 +6c`.
pub fn note_label(hz: f32) -> String {
    match frequency_to_note(hz) {
        Some(note) => format!("{}{} {:+.0}c", note.name, note.octave, note.cents),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_label_formats_a4() {
        assert_eq!(note_label(440.0), "A4 +0c");
    }

    #[test]
    fn note_label_handles_degenerate_input() {
        assert_eq!(note_label(0.0), "-");
        assert_eq!(note_label(f32::NAN), "-");
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/roomtone.toml"))).is_err());
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roomtone.toml");
        std::fs::write(&path, "fft_size = 2048\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.fft_size, 2048);
        assert_eq!(config.sample_rate, 44100);
    }
}
