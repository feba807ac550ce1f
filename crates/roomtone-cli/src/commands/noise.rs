//! Ambient noise-floor rating.

use clap::Args;
use roomtone_analysis::{
    NoiseFloorSession, SpectrumAnalyzer, Window, DEFAULT_BAND_FLOOR_DB,
};
use roomtone_config::AnalysisConfig;
use roomtone_core::rms;
use std::path::PathBuf;

use super::common;

#[derive(Args)]
pub struct NoiseArgs {
    /// WAV recording of the quiet room
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Only analyze the first N seconds (defaults to the configured window)
    #[arg(long, value_name = "SECONDS")]
    window: Option<f32>,

    /// Write the result as JSON
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

pub fn run(args: NoiseArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    println!("Rating ambient noise floor of {}...", args.input.display());

    let (samples, sample_rate) = common::load_mono(&args.input, config)?;
    let window_seconds = args.window.unwrap_or(config.noise_window_seconds);
    let window_samples = ((window_seconds * sample_rate) as usize).min(samples.len());
    let samples = &samples[..window_samples];

    let analyzer = SpectrumAnalyzer::new(config.fft_size, Window::Hann);
    let mut session = NoiseFloorSession::new(sample_rate, config.fft_size);
    for block in samples.chunks_exact(config.fft_size) {
        session.push_rms(rms(block));
        session.push_snapshot(&analyzer.db_frame(block));
    }

    let Some(result) = session.finalize(DEFAULT_BAND_FLOOR_DB) else {
        anyhow::bail!(
            "recording too short: need at least {} samples for one analysis block",
            config.fft_size
        );
    };

    println!();
    println!("  Average level : {:>7.1} dB", result.average_db);
    println!("  Peak level    : {:>7.1} dB", result.peak_db);
    println!("  Est. dBA      : {:>7.1} dBA", result.estimated_dba);
    println!("  Rating        : {}", result.rating.label());
    println!();
    println!("  Band levels:");
    for (band, db) in result.band_levels.iter() {
        let (low, high) = band.range_hz();
        println!(
            "    {:<13} {:>5.0}-{:<5.0} Hz  {:>7.1} dB",
            band.name(),
            low,
            high,
            db
        );
    }

    if let Some(output) = &args.output {
        common::write_json(output, &result)?;
    }
    Ok(())
}
