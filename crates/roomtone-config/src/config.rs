//! The `roomtone.toml` analysis configuration document.

use std::path::Path;

use roomtone_analysis::TransientConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ConfigError;

/// Analysis parameters for a measurement run.
///
/// Every field has a canonical default, so an empty document (or no document
/// at all) yields a fully usable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Expected capture sample rate in Hz.
    pub sample_rate: u32,
    /// FFT size for frequency-domain frames. Must be a power of two.
    pub fft_size: usize,
    /// Length of the ambient-listening window in seconds.
    pub noise_window_seconds: f32,
    /// Decay segment captured after each clap, in seconds.
    pub decay_capture_seconds: f32,
    /// Downsampled copies multiplied in the Harmonic Product Spectrum.
    pub num_harmonics: usize,
    /// Clap-detection parameters.
    pub transient: TransientConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            fft_size: 8192,
            noise_window_seconds: 15.0,
            decay_capture_seconds: 3.0,
            num_harmonics: 5,
            transient: TransientConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a TOML file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::read_file(path, e))?;
        let config: AnalysisConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sample_rate == 0 {
            return Err(ValidationError::ZeroSampleRate);
        }
        if self.fft_size < 2 || !self.fft_size.is_power_of_two() {
            return Err(ValidationError::FftSizeNotPowerOfTwo(self.fft_size));
        }
        if self.noise_window_seconds <= 0.0 || !self.noise_window_seconds.is_finite() {
            return Err(ValidationError::NonPositive {
                field: "noise_window_seconds",
            });
        }
        if self.decay_capture_seconds <= 0.0 || !self.decay_capture_seconds.is_finite() {
            return Err(ValidationError::NonPositive {
                field: "decay_capture_seconds",
            });
        }
        if self.num_harmonics < 2 {
            return Err(ValidationError::TooFewHarmonics(self.num_harmonics));
        }

        let t = &self.transient;
        if t.window_size == 0 {
            return Err(ValidationError::NonPositive {
                field: "transient.window_size",
            });
        }
        if t.threshold_db <= 0.0 || !t.threshold_db.is_finite() {
            return Err(ValidationError::NonPositive {
                field: "transient.threshold_db",
            });
        }
        if !(0.0..=1.0).contains(&t.min_amplitude) {
            return Err(ValidationError::AmplitudeOutOfRange(t.min_amplitude));
        }
        if t.min_interval_seconds < 0.0 || !t.min_interval_seconds.is_finite() {
            return Err(ValidationError::NonPositive {
                field: "transient.min_interval_seconds",
            });
        }
        Ok(())
    }
}

/// A configuration field outside its allowed range.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Sample rate must be nonzero
    #[error("sample_rate must be greater than zero")]
    ZeroSampleRate,

    /// FFT size must be a power of two
    #[error("fft_size must be a power of two >= 2, got {0}")]
    FftSizeNotPowerOfTwo(usize),

    /// The HPS needs at least two downsampled copies
    #[error("num_harmonics must be at least 2, got {0}")]
    TooFewHarmonics(usize),

    /// A field that must be strictly positive is not
    #[error("{field} must be positive and finite")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Amplitude gates live in [0, 1]
    #[error("transient.min_amplitude must be in [0, 1], got {0}")]
    AmplitudeOutOfRange(f32),
}
