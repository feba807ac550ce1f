//! Fundamental and overtone detection.

use clap::Args;
use roomtone_analysis::{detect_overtones, AveragedSpectrum, SpectrumAnalyzer, Window};
use roomtone_config::AnalysisConfig;
use std::path::PathBuf;

use super::common;

#[derive(Args)]
pub struct OvertonesArgs {
    /// WAV recording of a sustained instrument tone
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Override the number of HPS harmonics
    #[arg(long, value_name = "N")]
    harmonics: Option<usize>,

    /// Write the result as JSON
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

pub fn run(args: OvertonesArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    println!("Detecting overtones in {}...", args.input.display());

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

    let num_harmonics = args.harmonics.unwrap_or(config.num_harmonics);
    let result = detect_overtones(&spectrum, sample_rate, config.fft_size, num_harmonics);

    println!();
    if result.fundamental_hz > 0.0 {
        println!(
            "  Fundamental : {:.1} Hz ({})",
            result.fundamental_hz,
            common::note_label(result.fundamental_hz)
        );
    } else {
        println!("  Fundamental : not found (recording too quiet?)");
    }
    println!("  Confidence  : {:.0}%", result.confidence * 100.0);

    if result.harmonics.is_empty() {
        println!("  No harmonic peaks classified.");
    } else {
        println!();
        println!("   harmonic   frequency        note     level");
        for peak in &result.harmonics {
            println!(
                "  {:>9}  {:>8.1} Hz  {:>9}  {:>7.1} dB",
                peak.harmonic_number,
                peak.frequency,
                common::note_label(peak.frequency),
                peak.amplitude_db
            );
        }
    }

    if let Some(output) = &args.output {
        common::write_json(output, &result)?;
    }
    Ok(())
}
