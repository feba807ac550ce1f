//! Room-instrument compatibility scoring.
//!
//! Fuses the instrument's per-band levels, the room's ambient band levels,
//! and the overtone analysis into a single 0-100 score with a
//! human-readable rationale. Three independently capped components:
//! resonance complement (40), spectral richness (35), signal clarity (25).

use roomtone_core::EnergyCentre;
use serde::{Deserialize, Serialize};

use crate::bands::BandLevels;
use crate::noise::DEFAULT_BAND_FLOOR_DB;

/// Lower edge of the coverage normalisation range.
///
/// Instrument band levels are normalised from [-80, 0] dB to [0, 1].
/// Deliberately distinct from [`DEFAULT_BAND_FLOOR_DB`]; the two calibrate
/// different outputs.
pub const SILENCE_FLOOR_DB: f32 = -80.0;

/// Mean headroom (dB) that earns the full resonance-complement component.
const FULL_RESONANCE_HEADROOM_DB: f32 = 30.0;

/// Headroom (dB) a band needs to count toward spectral richness.
const RICHNESS_HEADROOM_DB: f32 = 6.0;

/// Harmonic count that earns the full harmonic share of signal clarity.
const FULL_CLARITY_HARMONICS: f32 = 6.0;

/// Normalised presence of the instrument in each band, in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentreCoverage {
    /// 32-128 Hz
    pub root: f32,
    /// 128-256 Hz
    pub sacral: f32,
    /// 256-384 Hz
    pub solar_plexus: f32,
    /// 384-512 Hz
    pub heart: f32,
    /// 512-768 Hz
    pub throat: f32,
    /// 768-1024 Hz
    pub third_eye: f32,
    /// 1024 Hz and above
    pub crown: f32,
}

impl CentreCoverage {
    /// Build from a per-band function.
    pub fn from_fn(mut f: impl FnMut(EnergyCentre) -> f32) -> Self {
        Self {
            root: f(EnergyCentre::Root),
            sacral: f(EnergyCentre::Sacral),
            solar_plexus: f(EnergyCentre::SolarPlexus),
            heart: f(EnergyCentre::Heart),
            throat: f(EnergyCentre::Throat),
            third_eye: f(EnergyCentre::ThirdEye),
            crown: f(EnergyCentre::Crown),
        }
    }

    /// Coverage of one band.
    pub fn get(&self, band: EnergyCentre) -> f32 {
        match band {
            EnergyCentre::Root => self.root,
            EnergyCentre::Sacral => self.sacral,
            EnergyCentre::SolarPlexus => self.solar_plexus,
            EnergyCentre::Heart => self.heart,
            EnergyCentre::Throat => self.throat,
            EnergyCentre::ThirdEye => self.third_eye,
            EnergyCentre::Crown => self.crown,
        }
    }

    /// Iterate bands with their coverage, in ascending frequency order.
    pub fn iter(&self) -> impl Iterator<Item = (EnergyCentre, f32)> + '_ {
        EnergyCentre::ALL.into_iter().map(|band| (band, self.get(band)))
    }
}

/// Scored compatibility of one instrument with one room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityReport {
    /// Fused score, integer in [0, 100].
    pub score: u8,
    /// Normalised per-band instrument presence (not part of the score).
    pub coverage: CentreCoverage,
    /// Generated rationale for the score.
    pub summary: String,
}

/// Score how well a room's ambient floor supports an instrument.
///
/// `noise` falls back to [`DEFAULT_BAND_FLOOR_DB`] in every band when no
/// ambient measurement is available.
pub fn score_compatibility(
    instrument: &BandLevels,
    noise: Option<&BandLevels>,
    confidence: f32,
    harmonic_count: usize,
) -> CompatibilityReport {
    let fallback = BandLevels::splat(DEFAULT_BAND_FLOOR_DB);
    let noise = noise.unwrap_or(&fallback);

    let band_count = EnergyCentre::ALL.len() as f32;

    // Resonance complement: average headroom, full marks at 30 dB.
    let mean_headroom: f32 = EnergyCentre::ALL
        .into_iter()
        .map(|band| (instrument.get(band) - noise.get(band)).max(0.0))
        .sum::<f32>()
        / band_count;
    let resonance = (mean_headroom / FULL_RESONANCE_HEADROOM_DB * 40.0).min(40.0);

    // Spectral richness: fraction of bands clearly above the floor.
    let rich_bands = EnergyCentre::ALL
        .into_iter()
        .filter(|&band| instrument.get(band) - noise.get(band) > RICHNESS_HEADROOM_DB)
        .count();
    let richness = rich_bands as f32 / band_count * 35.0;

    // Signal clarity: overtone confidence blended with harmonic count.
    let harmonic_share = (harmonic_count as f32 / FULL_CLARITY_HARMONICS).min(1.0);
    let clarity = (0.6 * confidence.clamp(0.0, 1.0) + 0.4 * harmonic_share) * 25.0;

    let score = (resonance + richness + clarity).clamp(0.0, 100.0).round() as u8;

    let coverage = CentreCoverage::from_fn(|band| {
        ((instrument.get(band) - SILENCE_FLOOR_DB) / -SILENCE_FLOOR_DB).clamp(0.0, 1.0)
    });

    CompatibilityReport {
        score,
        coverage,
        summary: summary_text(score, harmonic_count),
    }
}

/// Rationale text, banded on the score (>= 80 / >= 60 / >= 40 / else) and on
/// the harmonic count (>= 5 / >= 3 / else). The thresholds are part of the
/// output contract; the phrasing hangs off them.
fn summary_text(score: u8, harmonic_count: usize) -> String {
    let fit = if score >= 80 {
        "This room complements the instrument exceptionally well"
    } else if score >= 60 {
        "This room supports the instrument well"
    } else if score >= 40 {
        "This room is workable for the instrument"
    } else {
        "This room works against the instrument"
    };

    let overtones = if harmonic_count >= 5 {
        "a rich overtone series rises clear of the ambient floor"
    } else if harmonic_count >= 3 {
        "several overtones rise clear of the ambient floor"
    } else {
        "few overtones rise above the ambient floor"
    };

    format!("{fit}; {overtones}.")
}
