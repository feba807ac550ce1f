//! Integration tests for roomtone-analysis.
//!
//! Exercises the whole measurement pipeline over synthetic recordings with
//! known properties: a clap-excited room decay, an ambient noise bed, and a
//! harmonic instrument tone.

use std::f32::consts::PI;

use roomtone_analysis::{
    band_levels, detect_transients, estimate_rt60, extract_impulse, score_compatibility,
    DecayQuality, InstrumentSession, NoiseFloorSession, NoiseRating, SpectrumAnalyzer,
    TransientConfig, Window, DEFAULT_BAND_FLOOR_DB,
};
use roomtone_core::{db_to_linear, frequency_to_note, rms};

const SAMPLE_RATE: f32 = 44100.0;
const FFT_SIZE: usize = 8192;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Deterministic pseudo-noise in [-1, 1] (xorshift).
fn noise(len: usize, amplitude: f32, mut seed: u32) -> Vec<f32> {
    (0..len)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            amplitude * ((seed as i32 as f32) / (i32::MAX as f32))
        })
        .collect()
}

/// A clap followed by an exponential room decay with the given RT60.
fn clap_with_decay(rt60_seconds: f32, seconds: f32) -> Vec<f32> {
    let n = (seconds * SAMPLE_RATE) as usize;
    // 60 dB of amplitude decay over rt60: amp ~ 10^(-3 t / rt60)
    let rate = 3.0 * core::f32::consts::LN_10 / rt60_seconds;
    noise(n, 1.0, 0x2f6e2b1)
        .into_iter()
        .enumerate()
        .map(|(i, x)| {
            let t = i as f32 / SAMPLE_RATE;
            x * (-rate * t).exp()
        })
        .collect()
}

/// Bin-centred fundamental near A3, so that analysis frames see no leakage.
const TONE_HZ: f32 = 41.0 * SAMPLE_RATE / FFT_SIZE as f32; // ~220.7 Hz

/// A sum of harmonics of `fundamental` with rolling-off amplitudes.
fn harmonic_tone(fundamental: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (1..=4)
                .map(|h| {
                    let amp = 0.5 / h as f32;
                    amp * (2.0 * PI * fundamental * h as f32 * t).sin()
                })
                .sum()
        })
        .collect()
}

// ===========================================================================
// 1. Reverberation pipeline: claps -> events -> impulses -> RT60
// ===========================================================================

#[test]
fn clap_to_rt60_pipeline_recovers_decay_time() {
    let target_rt60 = 0.6;

    // One second of quiet bed, then the clap + decay, then more bed.
    let bed_level = 0.0005;
    let mut recording = noise(44100, bed_level, 0x1234567);
    recording.extend(clap_with_decay(target_rt60, 2.0));
    recording.extend(noise(44100, bed_level, 0x7654321));

    let events = detect_transients(&recording, SAMPLE_RATE, &TransientConfig::default());
    assert_eq!(events.len(), 1, "exactly one clap expected");

    let event = events[0];
    assert!(
        (event.sample_index as i32 - 44100).abs() < 2048,
        "onset found at {}",
        event.sample_index
    );

    let segment = extract_impulse(&recording, &event, 3.0, SAMPLE_RATE);
    assert!(!segment.is_empty());

    let result = estimate_rt60(segment, SAMPLE_RATE).unwrap();
    assert!(
        (result.rt60_seconds - target_rt60).abs() < 0.2,
        "rt60 {} should be near {target_rt60}",
        result.rt60_seconds
    );
    assert_eq!(result.quality, DecayQuality::Good);
    assert_eq!(result.decay_curve.len(), segment.len());
}

#[test]
fn multiple_claps_each_get_a_measurement() {
    let mut recording = noise(44100, 0.0005, 0xabc);
    for _ in 0..3 {
        recording.extend(clap_with_decay(0.4, 1.5));
        recording.extend(noise(22050, 0.0005, 0xdef));
    }

    let events = detect_transients(&recording, SAMPLE_RATE, &TransientConfig::default());
    assert_eq!(events.len(), 3);

    for event in &events {
        let segment = extract_impulse(&recording, event, 3.0, SAMPLE_RATE);
        let result = estimate_rt60(segment, SAMPLE_RATE).unwrap();
        assert!(
            result.rt60_seconds > 0.2 && result.rt60_seconds < 0.7,
            "rt60 {}",
            result.rt60_seconds
        );
    }
}

// ===========================================================================
// 2. Noise pipeline: blocks -> session -> rating
// ===========================================================================

#[test]
fn ambient_bed_rates_from_block_stream() {
    let analyzer = SpectrumAnalyzer::new(FFT_SIZE, Window::Hann);
    // ~ -55 dB RMS noise bed. Uniform noise at amplitude a has RMS a/sqrt(3).
    let target_rms = db_to_linear(-55.0);
    let bed = noise(FFT_SIZE * 20, target_rms * 3.0_f32.sqrt(), 0x51f15);

    let mut session = NoiseFloorSession::new(SAMPLE_RATE, FFT_SIZE);
    for block in bed.chunks_exact(FFT_SIZE) {
        session.push_rms(rms(block));
        session.push_snapshot(&analyzer.db_frame(block));
    }
    assert_eq!(session.sample_count(), 20);

    let result = session.finalize(DEFAULT_BAND_FLOOR_DB).unwrap();
    assert!(
        (result.average_db - -55.0).abs() < 1.5,
        "average {}",
        result.average_db
    );
    assert_eq!(result.rating, NoiseRating::Excellent);
    assert!(result.peak_db >= result.average_db);
    assert!((result.estimated_dba - (result.average_db + 3.0)).abs() < 1e-4);

    // Band levels were measured, not defaulted.
    for (band, db) in result.band_levels.iter() {
        assert!(db.is_finite(), "{band:?} was {db}");
        assert_ne!(db, DEFAULT_BAND_FLOOR_DB);
    }
}

// ===========================================================================
// 3. Instrument pipeline: tone -> profile -> compatibility
// ===========================================================================

#[test]
fn instrument_profile_from_tone_recording() {
    let analyzer = SpectrumAnalyzer::new(FFT_SIZE, Window::Rectangular);
    // One bin-centred block looped: every analysis frame is phase-aligned.
    let tone = harmonic_tone(TONE_HZ, FFT_SIZE).repeat(8);

    let mut session = InstrumentSession::new(SAMPLE_RATE, FFT_SIZE, 5);
    for block in tone.chunks_exact(FFT_SIZE) {
        session.push_snapshot(&analyzer.db_frame(block));
    }

    let profile = session.finalize(None).unwrap();

    let bin_width = SAMPLE_RATE / FFT_SIZE as f32;
    assert!(
        (profile.fundamental_hz - TONE_HZ).abs() <= bin_width,
        "fundamental {}",
        profile.fundamental_hz
    );
    assert!(profile.harmonics.len() >= 3, "got {:?}", profile.harmonics);
    assert!(profile.confidence > 0.0);
    assert!(profile.compatibility_score > 0);

    // ~220 Hz sits in the Sacral band; its energy must dominate Root.
    assert!(profile.band_levels.sacral > profile.band_levels.root);

    // The label for the fundamental should be an A, a few cents sharp.
    let note = frequency_to_note(profile.fundamental_hz).unwrap();
    assert_eq!(note.name, "A");
    assert_eq!(note.octave, 3);
    assert!(note.cents.abs() < 10.0);
}

#[test]
fn compatibility_prefers_quiet_rooms() {
    // A broadband instrument frame at -20 dB, rooms measured at -65 / -25.
    let instrument = band_levels(&vec![-20.0; FFT_SIZE / 2], SAMPLE_RATE, FFT_SIZE);
    let quiet_room = band_levels(&vec![-65.0; FFT_SIZE / 2], SAMPLE_RATE, FFT_SIZE);
    let loud_room = band_levels(&vec![-25.0; FFT_SIZE / 2], SAMPLE_RATE, FFT_SIZE);

    let quiet = score_compatibility(&instrument, Some(&quiet_room), 0.8, 4);
    let loud = score_compatibility(&instrument, Some(&loud_room), 0.8, 4);

    assert!(quiet.score > loud.score);
    assert!(!quiet.summary.is_empty());
}
