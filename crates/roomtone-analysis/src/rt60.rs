//! Reverberation-time estimation from impulse decay segments.
//!
//! The decay curve comes from Schroeder backward integration of the squared
//! impulse response; RT60 is extrapolated from the measured 20 dB decay
//! (T20, -5 to -25 dB) when the capture has enough dynamic range, falling
//! back to a coarser single-point 10 dB extrapolation otherwise.

use roomtone_core::power_ratio_to_db;
use serde::{Deserialize, Serialize};

/// How trustworthy a decay measurement is, rated from the dynamic range the
/// capture actually reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayQuality {
    /// Curve reached -35 dB or below
    Good,
    /// Curve reached -20 dB or below
    Fair,
    /// Curve never cleared -20 dB
    Poor,
}

impl DecayQuality {
    /// Rate a decay curve by its minimum value.
    pub fn from_curve_min(min_db: f32) -> Self {
        if min_db <= -35.0 {
            DecayQuality::Good
        } else if min_db <= -20.0 {
            DecayQuality::Fair
        } else {
            DecayQuality::Poor
        }
    }

    /// Lowercase label for display.
    pub fn label(self) -> &'static str {
        match self {
            DecayQuality::Good => "good",
            DecayQuality::Fair => "fair",
            DecayQuality::Poor => "poor",
        }
    }
}

/// One reverberation-time estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rt60Result {
    /// Extrapolated 60 dB decay time in seconds (0.0 when no decay was
    /// measurable).
    pub rt60_seconds: f32,
    /// Schroeder decay curve in dB, same length as the input segment.
    pub decay_curve: Vec<f32>,
    /// Rating of the measurement itself, independent of `rt60_seconds`.
    pub quality: DecayQuality,
}

/// Schroeder backward integration of an impulse segment.
///
/// Squares every sample, accumulates a reverse cumulative sum (so each point
/// holds the energy remaining from that point to the end), and converts to
/// dB relative to the total integrated energy. The result starts at 0 dB and
/// is non-increasing. If the segment carries no energy at all, the
/// unconverted all-zero curve is returned unchanged; this is a defined
/// degenerate case, not an error.
pub fn schroeder_decay_curve(impulse: &[f32]) -> Vec<f32> {
    let squared: Vec<f32> = impulse.iter().map(|&x| x * x).collect();

    let mut energy = vec![0.0_f32; squared.len()];
    let mut sum = 0.0_f32;
    for (i, &sq) in squared.iter().enumerate().rev() {
        sum += sq;
        energy[i] = sum;
    }

    let total = energy.first().copied().unwrap_or(0.0);
    if total <= 0.0 {
        return energy;
    }

    energy
        .into_iter()
        .map(|e| power_ratio_to_db(e / total))
        .collect()
}

/// Estimate RT60 from an impulse decay segment.
///
/// Returns `None` for an empty segment. Otherwise the result always carries
/// the full decay curve and a quality rating; `rt60_seconds` is 0.0 when the
/// curve never decays far enough for either extrapolation tier. Callers must
/// read `quality` separately from `rt60_seconds` — the fallback tier can
/// produce a plausible time from a poor capture.
pub fn estimate_rt60(impulse: &[f32], sample_rate: f32) -> Option<Rt60Result> {
    if impulse.is_empty() || sample_rate <= 0.0 {
        return None;
    }

    let curve = schroeder_decay_curve(impulse);

    let first_at_or_below =
        |threshold: f32| curve.iter().position(|&db| db <= threshold);

    let t5 = first_at_or_below(-5.0);
    let t25 = first_at_or_below(-25.0);

    let rt60_seconds = match (t5, t25) {
        // T20: extrapolate the measured 20 dB decay to 60 dB.
        (Some(t5), Some(t25)) if t25 > t5 => (t25 - t5) as f32 / sample_rate * 3.0,
        // Insufficient dynamic range: single-point 10 dB extrapolation.
        _ => match first_at_or_below(-10.0) {
            Some(t10) => t10 as f32 / sample_rate * 6.0,
            None => 0.0,
        },
    };

    let min_db = curve.iter().copied().fold(f32::INFINITY, f32::min);

    Some(Rt60Result {
        rt60_seconds,
        quality: DecayQuality::from_curve_min(min_db),
        decay_curve: curve,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;

    /// Exponentially decaying impulse whose energy drops `db_span` dB over
    /// `seconds`.
    fn exponential_decay(db_span: f32, seconds: f32, sample_rate: f32) -> Vec<f32> {
        let n = (seconds * sample_rate) as usize;
        // energy ~ 10^(-db_span * t / (10 * seconds))
        let rate = db_span * core::f32::consts::LN_10 / (20.0 * seconds);
        (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate;
                (-rate * t).exp()
            })
            .collect()
    }

    #[test]
    fn curve_starts_at_zero_and_never_rises() {
        let impulse = exponential_decay(40.0, 1.0, SAMPLE_RATE);
        let curve = schroeder_decay_curve(&impulse);

        assert_eq!(curve.len(), impulse.len());
        assert!(curve[0].abs() < 1e-4, "curve starts at {}", curve[0]);
        for pair in curve.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-4, "curve rose: {:?}", pair);
        }
        assert!(curve.iter().all(|&db| db <= 1e-4));
    }

    #[test]
    fn zero_energy_segment_returns_zero_curve() {
        let curve = schroeder_decay_curve(&[0.0; 256]);
        assert_eq!(curve.len(), 256);
        assert!(curve.iter().all(|&db| db == 0.0));
    }

    #[test]
    fn linear_thirty_db_decay_uses_t20_path() {
        // Energy falling 0 -> -30 dB over 1 s: T20 spans 20 dB in ~2/3 s,
        // extrapolating to rt60 near 2 s. The Schroeder tail pulls the -25
        // crossing slightly early, so allow a wide-ish tolerance.
        let impulse = exponential_decay(30.0, 1.0, SAMPLE_RATE);
        let result = estimate_rt60(&impulse, SAMPLE_RATE).unwrap();

        assert!(
            (result.rt60_seconds - 2.0).abs() < 0.25,
            "rt60 was {}",
            result.rt60_seconds
        );
        // Curve minimum dives past -35 at the very end of the segment.
        assert!(matches!(
            result.quality,
            DecayQuality::Good | DecayQuality::Fair
        ));
    }

    #[test]
    fn silence_padding_does_not_change_rt60() {
        let impulse = exponential_decay(40.0, 0.5, SAMPLE_RATE);
        let base = estimate_rt60(&impulse, SAMPLE_RATE).unwrap();

        let mut padded = impulse.clone();
        padded.extend(std::iter::repeat_n(0.0, 44100));
        let padded_result = estimate_rt60(&padded, SAMPLE_RATE).unwrap();

        assert_eq!(base.rt60_seconds, padded_result.rt60_seconds);
        assert_eq!(padded_result.decay_curve.len(), padded.len());
    }

    #[test]
    fn short_capture_falls_back_to_t10() {
        // 150 flat samples: the curve bottoms out at 10*log10(1/150) ≈
        // -21.8 dB, so the -25 crossing never happens and the single-point
        // tier takes over. -5 dB first crossed at index 103, -10 dB at 135.
        let impulse = vec![0.5_f32; 150];
        let result = estimate_rt60(&impulse, SAMPLE_RATE).unwrap();

        // Allow one index of f32 rounding slack around the -10 dB crossing.
        let expected = 135.0 / SAMPLE_RATE * 6.0;
        assert!(
            (result.rt60_seconds - expected).abs() <= 6.0 / SAMPLE_RATE + 1e-6,
            "rt60 was {}, expected {expected}",
            result.rt60_seconds
        );
        // Quality reflects the weak capture independently of the time.
        assert_eq!(result.quality, DecayQuality::Fair);
    }

    #[test]
    fn empty_segment_is_no_data() {
        assert!(estimate_rt60(&[], SAMPLE_RATE).is_none());
    }

    #[test]
    fn quality_thresholds() {
        assert_eq!(DecayQuality::from_curve_min(-35.0), DecayQuality::Good);
        assert_eq!(DecayQuality::from_curve_min(-34.9), DecayQuality::Fair);
        assert_eq!(DecayQuality::from_curve_min(-20.0), DecayQuality::Fair);
        assert_eq!(DecayQuality::from_curve_min(-19.9), DecayQuality::Poor);
    }

    #[test]
    fn result_round_trips_through_json() {
        let impulse = exponential_decay(40.0, 0.25, SAMPLE_RATE);
        let result = estimate_rt60(&impulse, SAMPLE_RATE).unwrap();

        let json = serde_json::to_string(&result).unwrap();
        let back: Rt60Result = serde_json::from_str(&json).unwrap();
        assert_eq!(result.rt60_seconds, back.rt60_seconds);
        assert_eq!(result.decay_curve, back.decay_curve);
    }
}
