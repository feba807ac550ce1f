//! Configuration for roomtone measurement runs.
//!
//! This crate owns the `roomtone.toml` document: capture defaults (sample
//! rate, FFT size, listening windows) and the clap-detection knobs, loaded
//! from the platform config directory or an explicit path, validated before
//! use.
//!
//! # Example
//!
//! ```rust,no_run
//! use roomtone_config::{AnalysisConfig, default_config_path};
//!
//! let path = default_config_path();
//! let config = if path.exists() {
//!     AnalysisConfig::load(&path).unwrap()
//! } else {
//!     AnalysisConfig::default()
//! };
//! assert!(config.fft_size.is_power_of_two());
//! ```

mod config;
mod error;

/// Platform-specific configuration paths.
pub mod paths;

pub use config::{AnalysisConfig, ValidationError};
pub use error::ConfigError;
pub use paths::{default_config_path, ensure_user_config_dir, user_config_dir};
