//! Instrument profiling: one recording session to one value object.
//!
//! An [`InstrumentSession`] accumulates frequency snapshots while an
//! instrument is being recorded, then finalises once into an immutable
//! [`InstrumentProfile`] carrying the fundamental, harmonics, band levels,
//! compatibility score, coverage, rationale, and the averaged spectrum.

use serde::{Deserialize, Serialize};

use crate::bands::{band_levels, BandLevels};
use crate::noise::NoiseFloorResult;
use crate::overtones::{detect_overtones, HarmonicPeak};
use crate::score::{score_compatibility, CentreCoverage};
use crate::spectrum::AveragedSpectrum;

/// Everything roomtone knows about one instrument in one room.
///
/// Created once per completed recording; never mutated, only discarded.
/// Serialises losslessly across the persistence boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentProfile {
    /// Detected fundamental frequency in Hz.
    pub fundamental_hz: f32,
    /// Accepted harmonics in detection order.
    pub harmonics: Vec<HarmonicPeak>,
    /// Overtone-detection confidence in [0, 1].
    pub confidence: f32,
    /// Instrument level per energy centre, in dB.
    pub band_levels: BandLevels,
    /// Fused room-instrument score, integer in [0, 100].
    pub compatibility_score: u8,
    /// Normalised per-band presence.
    pub centre_coverage: CentreCoverage,
    /// Generated rationale for the score.
    pub summary: String,
    /// Averaged dB spectrum over the whole recording.
    pub spectrum: Vec<f32>,
}

/// Accumulator for one instrument-recording session.
#[derive(Debug, Clone)]
pub struct InstrumentSession {
    sample_rate: f32,
    fft_size: usize,
    num_harmonics: usize,
    spectra: AveragedSpectrum,
}

impl InstrumentSession {
    /// Start a session for frames produced at the given rate and FFT size.
    pub fn new(sample_rate: f32, fft_size: usize, num_harmonics: usize) -> Self {
        Self {
            sample_rate,
            fft_size,
            num_harmonics,
            spectra: AveragedSpectrum::new(),
        }
    }

    /// Record one frequency-domain dB snapshot.
    pub fn push_snapshot(&mut self, frame: &[f32]) {
        self.spectra.push(frame);
    }

    /// Number of snapshots accumulated.
    pub fn snapshot_count(&self) -> usize {
        self.spectra.frame_count()
    }

    /// Finalise the session against an optional ambient measurement.
    ///
    /// Returns `None` when no snapshots were collected ("no data"). Without
    /// an ambient measurement the scorer assumes its default band floor.
    pub fn finalize(self, noise: Option<&NoiseFloorResult>) -> Option<InstrumentProfile> {
        let spectrum = self.spectra.mean()?;

        let levels = band_levels(&spectrum, self.sample_rate, self.fft_size);
        let overtones = detect_overtones(
            &spectrum,
            self.sample_rate,
            self.fft_size,
            self.num_harmonics,
        );
        let report = score_compatibility(
            &levels,
            noise.map(|n| &n.band_levels),
            overtones.confidence,
            overtones.harmonics.len(),
        );

        Some(InstrumentProfile {
            fundamental_hz: overtones.fundamental_hz,
            harmonics: overtones.harmonics,
            confidence: overtones.confidence,
            band_levels: levels,
            compatibility_score: report.score,
            centre_coverage: report.coverage,
            summary: report.summary,
            spectrum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{NoiseFloorSession, DEFAULT_BAND_FLOOR_DB};
    use crate::spectrum::hz_to_bin;

    const SAMPLE_RATE: f32 = 44100.0;
    const FFT_SIZE: usize = 8192;

    /// Frame with harmonic peaks of a 220 Hz tone over a quiet floor.
    fn instrument_frame() -> Vec<f32> {
        let mut frame = vec![-85.0_f32; FFT_SIZE / 2];
        for (mult, db) in [(1.0, -12.0), (2.0, -18.0), (3.0, -24.0), (4.0, -30.0)] {
            let bin = hz_to_bin(220.0 * mult, SAMPLE_RATE, FFT_SIZE);
            frame[bin] = db;
            frame[bin - 1] = db - 12.0;
            frame[bin + 1] = db - 12.0;
        }
        frame
    }

    #[test]
    fn empty_session_is_no_data() {
        let session = InstrumentSession::new(SAMPLE_RATE, FFT_SIZE, 5);
        assert!(session.finalize(None).is_none());
    }

    #[test]
    fn profile_carries_the_whole_analysis() {
        let mut session = InstrumentSession::new(SAMPLE_RATE, FFT_SIZE, 5);
        session.push_snapshot(&instrument_frame());
        session.push_snapshot(&instrument_frame());

        let profile = session.finalize(None).unwrap();

        assert!(
            (profile.fundamental_hz - 220.0).abs() < SAMPLE_RATE / FFT_SIZE as f32,
            "fundamental {}",
            profile.fundamental_hz
        );
        assert_eq!(profile.harmonics.len(), 4);
        assert!(profile.confidence > 0.0);
        assert_eq!(profile.spectrum.len(), FFT_SIZE / 2);
        assert!(profile.compatibility_score <= 100);
        assert!(!profile.summary.is_empty());
    }

    #[test]
    fn quieter_room_scores_at_least_as_high() {
        let noisy = {
            let mut s = NoiseFloorSession::new(SAMPLE_RATE, FFT_SIZE);
            s.push_rms(0.05);
            s.push_snapshot(&vec![-30.0; FFT_SIZE / 2]);
            s.finalize(DEFAULT_BAND_FLOOR_DB).unwrap()
        };
        let quiet = {
            let mut s = NoiseFloorSession::new(SAMPLE_RATE, FFT_SIZE);
            s.push_rms(0.001);
            s.push_snapshot(&vec![-65.0; FFT_SIZE / 2]);
            s.finalize(DEFAULT_BAND_FLOOR_DB).unwrap()
        };

        let profile_in = |noise: &NoiseFloorResult| {
            let mut session = InstrumentSession::new(SAMPLE_RATE, FFT_SIZE, 5);
            session.push_snapshot(&instrument_frame());
            session.finalize(Some(noise)).unwrap()
        };

        assert!(
            profile_in(&quiet).compatibility_score
                >= profile_in(&noisy).compatibility_score
        );
    }

    #[test]
    fn profile_round_trips_through_json() {
        let mut session = InstrumentSession::new(SAMPLE_RATE, FFT_SIZE, 5);
        session.push_snapshot(&instrument_frame());
        let profile = session.finalize(None).unwrap();

        let json = serde_json::to_string(&profile).unwrap();
        let back: InstrumentProfile = serde_json::from_str(&json).unwrap();

        assert_eq!(profile.fundamental_hz, back.fundamental_hz);
        assert_eq!(profile.spectrum, back.spectrum);
        assert_eq!(profile.band_levels, back.band_levels);
        assert_eq!(profile.compatibility_score, back.compatibility_score);
    }
}
