//! Per-band energy-centre levels of a recording.

use clap::Args;
use roomtone_analysis::{band_levels, AveragedSpectrum, SpectrumAnalyzer, Window};
use roomtone_config::AnalysisConfig;
use std::path::PathBuf;

use super::common;

#[derive(Args)]
pub struct BandsArgs {
    /// WAV recording to band
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write the band levels as JSON
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

pub fn run(args: BandsArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    println!("Banding {}...", args.input.display());

    let (samples, sample_rate) = common::load_mono(&args.input, config)?;
    let analyzer = SpectrumAnalyzer::new(config.fft_size, Window::Hann);

    let mut average = AveragedSpectrum::new();
    for frame in common::spectral_frames(&analyzer, &samples) {
        average.push(&frame);
    }
    let Some(spectrum) = average.mean() else {
        anyhow::bail!(
            "recording too short: need at least {} samples for one analysis block",
            config.fft_size
        );
    };

    let levels = band_levels(&spectrum, sample_rate, config.fft_size);

    println!();
    for (band, db) in levels.iter() {
        let (low, high) = band.range_hz();
        println!(
            "  {:<13} {:>5.0}-{:<5.0} Hz  {:>7.1} dB",
            band.name(),
            low,
            high,
            db
        );
    }

    if let Some(output) = &args.output {
        common::write_json(output, &levels)?;
    }
    Ok(())
}
