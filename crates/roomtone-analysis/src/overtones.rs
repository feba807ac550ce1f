//! Fundamental and overtone detection via Harmonic Product Spectrum.
//!
//! The HPS step multiplies downsampled copies of the linear-amplitude
//! spectrum so that a tone's harmonics reinforce its fundamental bin; peak
//! picking and harmonic classification then run against the original dB
//! spectrum.

use roomtone_core::db_to_linear;
use serde::{Deserialize, Serialize};

use crate::spectrum::bin_to_hz;

/// Peaks quieter than this are ignored.
const PEAK_THRESHOLD_DB: f32 = -60.0;

/// Minimum bin spacing between accepted peaks.
const MIN_PEAK_SPACING_BINS: usize = 5;

/// Only the strongest peaks are considered for harmonic classification.
const MAX_CLASSIFIED_PEAKS: usize = 16;

/// Peak-count cap used in the confidence denominator.
const CONFIDENCE_PEAK_CAP: usize = 10;

/// Relative tolerance for accepting a peak as an integer harmonic.
const HARMONIC_TOLERANCE: f32 = 0.08;

/// The HPS search ignores bins below this frequency.
const MIN_FUNDAMENTAL_HZ: f32 = 20.0;

/// Default number of downsampled copies multiplied into the product.
pub const DEFAULT_NUM_HARMONICS: usize = 5;

/// One spectral peak classified as a harmonic of the fundamental.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarmonicPeak {
    /// Peak frequency in Hz.
    pub frequency: f32,
    /// Peak level in dB.
    pub amplitude_db: f32,
    /// Which harmonic this is (1 = the fundamental itself).
    pub harmonic_number: u32,
}

/// Result of one overtone analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OvertoneResult {
    /// Detected fundamental frequency in Hz (0.0 for silent/degenerate
    /// input).
    pub fundamental_hz: f32,
    /// Accepted harmonics, ordered by detection (strongest peak first), not
    /// by harmonic number.
    pub harmonics: Vec<HarmonicPeak>,
    /// Fraction of considered peaks that classified as harmonics, in [0, 1].
    pub confidence: f32,
}

/// Find local maxima in a dB spectrum.
///
/// A peak must exceed both neighbours and [`PEAK_THRESHOLD_DB`], and must
/// sit at least [`MIN_PEAK_SPACING_BINS`] bins after the previously accepted
/// peak. Returns `(frequency_hz, amplitude_db)` pairs sorted descending by
/// amplitude.
pub fn find_spectral_peaks(
    spectrum_db: &[f32],
    sample_rate: f32,
    fft_size: usize,
) -> Vec<(f32, f32)> {
    let mut peaks: Vec<(f32, f32)> = Vec::new();
    let mut last_accepted_bin: Option<usize> = None;

    for bin in 1..spectrum_db.len().saturating_sub(1) {
        let db = spectrum_db[bin];
        if db <= PEAK_THRESHOLD_DB
            || db <= spectrum_db[bin - 1]
            || db <= spectrum_db[bin + 1]
        {
            continue;
        }
        if let Some(last) = last_accepted_bin
            && bin < last + MIN_PEAK_SPACING_BINS
        {
            continue;
        }
        peaks.push((bin_to_hz(bin, sample_rate, fft_size), db));
        last_accepted_bin = Some(bin);
    }

    peaks.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(core::cmp::Ordering::Equal));
    peaks
}

/// Harmonic Product Spectrum: the fundamental frequency in Hz.
///
/// Returns 0.0 when the spectrum is too short to downsample or no candidate
/// bin lies above [`MIN_FUNDAMENTAL_HZ`].
fn harmonic_product_fundamental(
    spectrum_db: &[f32],
    sample_rate: f32,
    fft_size: usize,
    num_harmonics: usize,
) -> f32 {
    if num_harmonics == 0 {
        return 0.0;
    }
    let out_len = spectrum_db.len() / num_harmonics;
    if out_len == 0 {
        return 0.0;
    }

    let mut product: Vec<f32> = spectrum_db[..out_len]
        .iter()
        .map(|&db| db_to_linear(db))
        .collect();
    for h in 2..=num_harmonics {
        for (i, p) in product.iter_mut().enumerate() {
            let source = i * h;
            if source < spectrum_db.len() {
                *p *= db_to_linear(spectrum_db[source]);
            }
        }
    }

    let min_bin = ((MIN_FUNDAMENTAL_HZ * fft_size as f32 / sample_rate).ceil() as usize).max(1);
    if min_bin >= out_len {
        return 0.0;
    }

    let best_bin = (min_bin..out_len)
        .max_by(|&a, &b| {
            product[a]
                .partial_cmp(&product[b])
                .unwrap_or(core::cmp::Ordering::Equal)
        })
        .unwrap_or(min_bin);

    bin_to_hz(best_bin, sample_rate, fft_size)
}

/// Detect the fundamental and classify spectral peaks as its harmonics.
///
/// A zero or non-finite fundamental (silent or degenerate input) yields
/// zero harmonics and zero confidence; the ratio computation is never run
/// against it.
pub fn detect_overtones(
    spectrum_db: &[f32],
    sample_rate: f32,
    fft_size: usize,
    num_harmonics: usize,
) -> OvertoneResult {
    let fundamental_hz =
        harmonic_product_fundamental(spectrum_db, sample_rate, fft_size, num_harmonics);
    let peaks = find_spectral_peaks(spectrum_db, sample_rate, fft_size);

    if !fundamental_hz.is_finite() || fundamental_hz <= 0.0 || peaks.is_empty() {
        return OvertoneResult {
            fundamental_hz: if fundamental_hz.is_finite() { fundamental_hz } else { 0.0 },
            harmonics: Vec::new(),
            confidence: 0.0,
        };
    }

    let considered = peaks.len().min(MAX_CLASSIFIED_PEAKS);
    let mut harmonics = Vec::new();
    for &(frequency, amplitude_db) in &peaks[..considered] {
        let ratio = frequency / fundamental_hz;
        let n = ratio.round();
        if n >= 1.0 && (ratio - n).abs() < HARMONIC_TOLERANCE {
            harmonics.push(HarmonicPeak {
                frequency,
                amplitude_db,
                harmonic_number: n as u32,
            });
        }
    }

    let denominator = peaks.len().min(CONFIDENCE_PEAK_CAP) as f32;
    let confidence = harmonics.len() as f32 / denominator;

    OvertoneResult {
        fundamental_hz,
        harmonics,
        confidence,
    }
}
