//! Ambient noise-floor estimation.
//!
//! A listening session accumulates per-block RMS samples and frequency
//! snapshots over a fixed window (~15 s by default at the capture layer),
//! then finalises once into an immutable [`NoiseFloorResult`]. The session
//! owns its buffers; nothing is shared across threads or calls.

use roomtone_core::linear_to_db;
use serde::{Deserialize, Serialize};

use crate::bands::{band_levels, BandLevels};

/// Band level assumed when no ambient measurement is available.
///
/// Callers supply this to [`NoiseFloorSession::finalize`] and to the
/// compatibility scorer; the estimator itself never invents band levels.
/// Distinct from the -80 dB silence floor used for coverage normalisation.
pub const DEFAULT_BAND_FLOOR_DB: f32 = -60.0;

/// Offset added to the average level to approximate an A-weighted reading.
const DBA_OFFSET_DB: f32 = 3.0;

/// Qualitative rating of an ambient noise floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseRating {
    /// Average below -50 dB
    Excellent,
    /// Average below -40 dB
    Good,
    /// Average below -30 dB
    Fair,
    /// Everything louder
    Poor,
}

impl NoiseRating {
    /// Rate an average ambient level.
    pub fn from_average_db(average_db: f32) -> Self {
        if average_db < -50.0 {
            NoiseRating::Excellent
        } else if average_db < -40.0 {
            NoiseRating::Good
        } else if average_db < -30.0 {
            NoiseRating::Fair
        } else {
            NoiseRating::Poor
        }
    }

    /// Lowercase label for display.
    pub fn label(self) -> &'static str {
        match self {
            NoiseRating::Excellent => "excellent",
            NoiseRating::Good => "good",
            NoiseRating::Fair => "fair",
            NoiseRating::Poor => "poor",
        }
    }
}

/// Immutable result of one ambient-listening session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseFloorResult {
    /// Mean of the RMS sequence, in dB.
    pub average_db: f32,
    /// Maximum of the RMS sequence, in dB.
    pub peak_db: f32,
    /// Approximate A-weighted level (`average_db + 3`).
    pub estimated_dba: f32,
    /// Mean ambient level per energy centre.
    pub band_levels: BandLevels,
    /// Qualitative rating of `average_db`.
    pub rating: NoiseRating,
}

/// Accumulator for one ambient-listening session.
///
/// Push per-block RMS amplitudes and frequency-domain snapshots as the
/// capture layer delivers them, then call [`finalize`](Self::finalize)
/// exactly once.
#[derive(Debug, Clone)]
pub struct NoiseFloorSession {
    sample_rate: f32,
    fft_size: usize,
    rms_samples: Vec<f32>,
    snapshots: Vec<Vec<f32>>,
}

impl NoiseFloorSession {
    /// Start a session for frames produced at the given rate and FFT size.
    pub fn new(sample_rate: f32, fft_size: usize) -> Self {
        Self {
            sample_rate,
            fft_size,
            rms_samples: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    /// Record one block's RMS amplitude (linear scale).
    pub fn push_rms(&mut self, rms: f32) {
        self.rms_samples.push(rms);
    }

    /// Record one frequency-domain dB snapshot.
    pub fn push_snapshot(&mut self, frame: &[f32]) {
        self.snapshots.push(frame.to_vec());
    }

    /// Number of RMS samples accumulated.
    pub fn sample_count(&self) -> usize {
        self.rms_samples.len()
    }

    /// Number of frequency snapshots accumulated.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Finalise the session into a [`NoiseFloorResult`].
    ///
    /// Returns `None` when no RMS samples were collected ("no data").
    /// When no snapshots were collected, every band level is set to the
    /// caller-supplied `band_fallback_db` instead of being computed.
    pub fn finalize(self, band_fallback_db: f32) -> Option<NoiseFloorResult> {
        if self.rms_samples.is_empty() {
            return None;
        }

        let mean_rms =
            self.rms_samples.iter().sum::<f32>() / self.rms_samples.len() as f32;
        let peak_rms = self
            .rms_samples
            .iter()
            .copied()
            .fold(0.0_f32, f32::max);

        let average_db = linear_to_db(mean_rms);
        let peak_db = linear_to_db(peak_rms);

        let bands = if self.snapshots.is_empty() {
            BandLevels::splat(band_fallback_db)
        } else {
            // Each snapshot is banded independently, then the per-band means
            // are taken across snapshots.
            let mut sums = [0.0_f32; 7];
            for snapshot in &self.snapshots {
                let levels = band_levels(snapshot, self.sample_rate, self.fft_size);
                for (i, db) in levels.to_array().into_iter().enumerate() {
                    sums[i] += db;
                }
            }
            let n = self.snapshots.len() as f32;
            BandLevels::from_fn(|band| sums[band.index()] / n)
        };

        Some(NoiseFloorResult {
            average_db,
            peak_db,
            estimated_dba: average_db + DBA_OFFSET_DB,
            band_levels: bands,
            rating: NoiseRating::from_average_db(average_db),
        })
    }
}
