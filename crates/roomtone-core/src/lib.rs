//! Roomtone Core - numeric primitives for room-acoustics analysis
//!
//! This crate provides the foundational pieces shared by every roomtone
//! analysis stage:
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear amplitude
//! - [`power_ratio_to_db`] - Convert an energy ratio to dB with a silence floor
//! - [`rms`] - Root-mean-square level of a sample block
//!
//! # Energy Centres
//!
//! - [`EnergyCentre`] - Closed enumeration of the seven fixed frequency bands
//!   used for acoustic banding, each carrying its Hz range as a compile-time
//!   constant
//!
//! # Musical Notes
//!
//! - [`Note`], [`frequency_to_note`], [`note_to_frequency`] - 12-tone
//!   equal-temperament conversion between frequencies and note labels
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! roomtone-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod bands;
pub mod level;
pub mod note;

pub use bands::EnergyCentre;
pub use level::{db_to_linear, linear_to_db, power_ratio_to_db, rms, SILENCE_EPSILON};
pub use note::{frequency_to_note, note_frequency, note_to_frequency, Note};
