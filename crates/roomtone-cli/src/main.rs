//! Roomtone CLI - room-acoustics measurement from recorded audio.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roomtone")]
#[command(author, version, about = "Room acoustics measurement toolkit", long_about = None)]
struct Cli {
    /// Path to a roomtone.toml (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rate the ambient noise floor of a quiet-room recording
    Noise(commands::noise::NoiseArgs),

    /// Measure reverberation time from a clap recording
    Reverb(commands::reverb::ReverbArgs),

    /// Detect the fundamental and overtone series of an instrument
    Overtones(commands::overtones::OvertonesArgs),

    /// Build a full instrument profile with a compatibility score
    Profile(commands::profile::ProfileArgs),

    /// Show per-band energy-centre levels of a recording
    Bands(commands::bands::BandsArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::common::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Noise(args) => commands::noise::run(args, &config),
        Commands::Reverb(args) => commands::reverb::run(args, &config),
        Commands::Overtones(args) => commands::overtones::run(args, &config),
        Commands::Profile(args) => commands::profile::run(args, &config),
        Commands::Bands(args) => commands::bands::run(args, &config),
    }
}
