//! Full instrument profiling against a measured room.

use anyhow::Context;
use clap::Args;
use roomtone_analysis::{
    InstrumentSession, NoiseFloorResult, SpectrumAnalyzer, Window,
};
use roomtone_config::AnalysisConfig;
use std::path::PathBuf;

use super::common;

#[derive(Args)]
pub struct ProfileArgs {
    /// WAV recording of the instrument in the room
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Noise-floor JSON produced by `roomtone noise --output`
    #[arg(long, value_name = "FILE")]
    noise: Option<PathBuf>,

    /// Write the profile as JSON
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

pub fn run(args: ProfileArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    println!("Profiling instrument recording {}...", args.input.display());

    let noise: Option<NoiseFloorResult> = match &args.noise {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("reading noise report {}", path.display()))?;
            Some(
                serde_json::from_reader(file)
                    .with_context(|| format!("parsing noise report {}", path.display()))?,
            )
        }
        None => {
            println!("  (no noise report given; assuming the default ambient floor)");
            None
        }
    };

    let (samples, sample_rate) = common::load_mono(&args.input, config)?;
    let analyzer = SpectrumAnalyzer::new(config.fft_size, Window::Hann);

    let mut session = InstrumentSession::new(sample_rate, config.fft_size, config.num_harmonics);
    for frame in common::spectral_frames(&analyzer, &samples) {
        session.push_snapshot(&frame);
    }

    let Some(profile) = session.finalize(noise.as_ref()) else {
        anyhow::bail!(
            "recording too short: need at least {} samples for one analysis block",
            config.fft_size
        );
    };

    println!();
    println!(
        "  Fundamental   : {:.1} Hz ({})",
        profile.fundamental_hz,
        common::note_label(profile.fundamental_hz)
    );
    println!("  Harmonics     : {}", profile.harmonics.len());
    println!("  Confidence    : {:.0}%", profile.confidence * 100.0);
    println!("  Compatibility : {}/100", profile.compatibility_score);
    println!();
    println!("  Band presence:");
    for ((band, db), (_, coverage)) in profile
        .band_levels
        .iter()
        .zip(profile.centre_coverage.iter())
    {
        let filled = (coverage * 20.0).round() as usize;
        println!(
            "    {:<13} {:>7.1} dB  [{}{}]",
            band.name(),
            db,
            "#".repeat(filled),
            "-".repeat(20 - filled)
        );
    }
    println!();
    println!("  {}", profile.summary);

    if let Some(output) = &args.output {
        common::write_json(output, &profile)?;
    }
    Ok(())
}
