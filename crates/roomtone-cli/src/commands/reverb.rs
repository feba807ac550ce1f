//! Reverberation-time measurement from clap recordings.

use clap::Args;
use roomtone_analysis::{
    detect_transients, estimate_rt60, extract_impulse, Rt60Result, TransientEvent,
};
use roomtone_config::AnalysisConfig;
use serde::Serialize;
use std::path::PathBuf;

use super::common;

#[derive(Args)]
pub struct ReverbArgs {
    /// WAV recording containing one or more claps
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Override the detection threshold in dB over background
    #[arg(long, value_name = "DB")]
    threshold_db: Option<f32>,

    /// Override the minimum clap amplitude (0-1)
    #[arg(long, value_name = "AMPLITUDE")]
    min_amplitude: Option<f32>,

    /// Write each extracted impulse response as a WAV into this directory
    #[arg(long, value_name = "DIR")]
    export_ir: Option<PathBuf>,

    /// Write the measurements as JSON
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// One clap with its decay measurement.
#[derive(Serialize)]
struct ClapMeasurement {
    event: TransientEvent,
    rt60: Rt60Result,
}

pub fn run(args: ReverbArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    println!("Measuring reverberation in {}...", args.input.display());

    let (samples, sample_rate) = common::load_mono(&args.input, config)?;

    let mut detector = config.transient;
    if let Some(db) = args.threshold_db {
        detector.threshold_db = db;
    }
    if let Some(amplitude) = args.min_amplitude {
        detector.min_amplitude = amplitude;
    }

    let events = detect_transients(&samples, sample_rate, &detector);
    if events.is_empty() {
        println!("No claps detected. Re-record with sharper, louder claps.");
        return Ok(());
    }
    println!("  {} clap(s) found", events.len());

    if let Some(dir) = &args.export_ir {
        std::fs::create_dir_all(dir)?;
    }

    let mut measurements = Vec::new();
    println!();
    println!("   #   time      peak   ratio    rt60  quality");
    for (i, event) in events.iter().enumerate() {
        let segment = extract_impulse(&samples, event, config.decay_capture_seconds, sample_rate);
        if segment.is_empty() {
            println!(
                "  {:>2}  {:>6.2}s  clap too close to the end of the recording, skipped",
                i + 1,
                event.time_seconds
            );
            continue;
        }

        let Some(rt60) = estimate_rt60(segment, sample_rate) else {
            continue;
        };

        println!(
            "  {:>2}  {:>6.2}s  {:>5.2}  {:>6.1}  {:>5.2}s  {}",
            i + 1,
            event.time_seconds,
            event.peak_amplitude,
            event.energy_ratio,
            rt60.rt60_seconds,
            rt60.quality.label()
        );

        if let Some(dir) = &args.export_ir {
            let path = dir.join(format!("impulse_{:02}.wav", i + 1));
            roomtone_io::write_wav_mono(&path, segment, sample_rate as u32)?;
        }

        measurements.push(ClapMeasurement {
            event: *event,
            rt60,
        });
    }

    if measurements.is_empty() {
        println!("No usable decay segments; every clap was cut off.");
        return Ok(());
    }

    let mean_rt60 = measurements
        .iter()
        .map(|m| m.rt60.rt60_seconds)
        .sum::<f32>()
        / measurements.len() as f32;
    println!();
    println!("  Mean RT60: {mean_rt60:.2}s over {} measurement(s)", measurements.len());

    if let Some(output) = &args.output {
        common::write_json(output, &measurements)?;
    }
    Ok(())
}
