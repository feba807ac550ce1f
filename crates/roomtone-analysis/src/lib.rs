//! Roomtone Analysis - the acoustic measurement engine
//!
//! This crate analyses a room's acoustic character from captured audio:
//!
//! - [`spectrum`] - FFT-backed dB magnitude frames with windowing
//! - [`bands`] - Spectral band mapper onto the seven energy centres
//! - [`noise`] - Ambient noise-floor estimation and rating
//! - [`transients`] - Clap detection and impulse-segment extraction
//! - [`rt60`] - Reverberation time via Schroeder backward integration
//! - [`overtones`] - Fundamental/harmonic detection via Harmonic Product Spectrum
//! - [`score`] - Room-instrument compatibility scoring
//! - [`profile`] - Instrument-recording sessions and profiles
//!
//! Every analysis function is a synchronous, pure transformation over
//! already-captured buffers: no I/O, no shared mutable state, no retained
//! state across calls beyond the explicit session accumulators. Capture,
//! timing, and persistence belong to the layers around this crate.
//!
//! ## Example Workflow
//!
//! ```rust,ignore
//! use roomtone_analysis::{
//!     detect_transients, estimate_rt60, extract_impulse, TransientConfig,
//! };
//!
//! // 1. Record claps in the room (external capture layer)
//!
//! // 2. Find the onsets
//! let events = detect_transients(&recording, 44100.0, &TransientConfig::default());
//!
//! // 3. Score the decay after each clap
//! for event in &events {
//!     let segment = extract_impulse(&recording, event, 3.0, 44100.0);
//!     if let Some(result) = estimate_rt60(segment, 44100.0) {
//!         println!("RT60 {:.2} s ({})", result.rt60_seconds, result.quality.label());
//!     }
//! }
//! ```

pub mod bands;
pub mod noise;
pub mod overtones;
pub mod profile;
pub mod rt60;
pub mod score;
pub mod spectrum;
pub mod transients;

// Re-export main types
pub use bands::{band_levels, BandLevels};
pub use noise::{NoiseFloorResult, NoiseFloorSession, NoiseRating, DEFAULT_BAND_FLOOR_DB};
pub use overtones::{
    detect_overtones, find_spectral_peaks, HarmonicPeak, OvertoneResult, DEFAULT_NUM_HARMONICS,
};
pub use profile::{InstrumentProfile, InstrumentSession};
pub use rt60::{estimate_rt60, schroeder_decay_curve, DecayQuality, Rt60Result};
pub use score::{score_compatibility, CentreCoverage, CompatibilityReport, SILENCE_FLOOR_DB};
pub use spectrum::{bin_to_hz, hz_to_bin, AveragedSpectrum, SpectrumAnalyzer, Window};
pub use transients::{detect_transients, extract_impulse, TransientConfig, TransientEvent};
