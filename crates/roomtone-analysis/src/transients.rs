//! Transient (clap) detection and impulse-segment extraction.
//!
//! A room is excited with sharp claps; this module finds those onsets in a
//! raw recording by comparing each analysis window's energy against a
//! running background estimate, then slices out the decay segment that
//! follows each onset for RT60 estimation.

use serde::{Deserialize, Serialize};

/// Number of preceding windows used for the background-energy estimate
/// (capped by the number of windows available).
const BACKGROUND_WINDOWS: usize = 20;

/// Detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransientConfig {
    /// Energy ratio over background required to fire, in dB.
    pub threshold_db: f32,
    /// Minimum peak sample amplitude for an onset to count.
    pub min_amplitude: f32,
    /// Minimum spacing between recorded onsets, in seconds.
    pub min_interval_seconds: f32,
    /// Analysis window length in samples.
    pub window_size: usize,
}

impl Default for TransientConfig {
    fn default() -> Self {
        Self {
            threshold_db: 6.0,
            min_amplitude: 0.1,
            min_interval_seconds: 0.3,
            window_size: 512,
        }
    }
}

/// One detected onset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransientEvent {
    /// Start of the detection window, in samples from the recording start.
    pub sample_index: usize,
    /// `sample_index` in seconds.
    pub time_seconds: f32,
    /// Peak absolute sample value inside the detection window.
    pub peak_amplitude: f32,
    /// Window energy over background energy.
    pub energy_ratio: f32,
}

/// Scan a raw recording for sharp onsets.
///
/// The recording is partitioned into non-overlapping windows of
/// `config.window_size` samples (a partial tail window is ignored). Each
/// window's mean-squared energy is compared against the mean energy of the
/// preceding windows; a window fires when the ratio exceeds the dB
/// threshold and it starts at least `min_interval_seconds` after the last
/// *recorded* event. Windows whose peak amplitude falls below
/// `min_amplitude` are suppressed without advancing the interval gate, so a
/// quiet false positive does not block a louder clap right behind it.
///
/// Returns chronologically ordered events; an empty result means no claps
/// were detected and is reported to the caller rather than retried.
pub fn detect_transients(
    recording: &[f32],
    sample_rate: f32,
    config: &TransientConfig,
) -> Vec<TransientEvent> {
    if config.window_size == 0 || sample_rate <= 0.0 {
        return Vec::new();
    }

    let num_windows = recording.len() / config.window_size;
    let energies: Vec<f32> = (0..num_windows)
        .map(|w| {
            let start = w * config.window_size;
            let window = &recording[start..start + config.window_size];
            window.iter().map(|&x| x * x).sum::<f32>() / config.window_size as f32
        })
        .collect();

    let background_windows = BACKGROUND_WINDOWS.min(num_windows);
    let threshold_ratio = 10.0_f32.powf(config.threshold_db / 10.0);
    let min_interval_samples = (config.min_interval_seconds * sample_rate) as usize;

    let mut events = Vec::new();
    let mut last_recorded: Option<usize> = None;

    for w in background_windows..num_windows {
        let background: f32 = energies[w - background_windows..w]
            .iter()
            .sum::<f32>()
            / background_windows as f32;
        let ratio = if background > 0.0 {
            energies[w] / background
        } else {
            0.0
        };
        if ratio <= threshold_ratio {
            continue;
        }

        let start = w * config.window_size;
        let gate_open = last_recorded
            .is_none_or(|last| start >= last + min_interval_samples);
        if !gate_open {
            continue;
        }

        let peak = recording[start..start + config.window_size]
            .iter()
            .fold(0.0_f32, |acc, &x| acc.max(x.abs()));
        if peak < config.min_amplitude {
            // Suppressed, and deliberately does not advance the gate.
            continue;
        }

        events.push(TransientEvent {
            sample_index: start,
            time_seconds: start as f32 / sample_rate,
            peak_amplitude: peak,
            energy_ratio: ratio,
        });
        last_recorded = Some(start);
    }

    events
}

/// Slice the decay segment following a detected onset.
///
/// Returns the sub-slice starting at the event's sample index, at most
/// `duration_seconds` long, clamped to the end of the recording. An event in
/// the very tail of the recording yields an empty slice, which callers must
/// treat as unusable rather than an error.
pub fn extract_impulse<'a>(
    recording: &'a [f32],
    event: &TransientEvent,
    duration_seconds: f32,
    sample_rate: f32,
) -> &'a [f32] {
    let start = event.sample_index.min(recording.len());
    let len = (duration_seconds * sample_rate) as usize;
    let end = start.saturating_add(len).min(recording.len());
    &recording[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;

    /// Low-level noise floor with deterministic variation.
    fn quiet_bed(len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let phase = i as f32 * 0.013;
                amplitude * phase.sin()
            })
            .collect()
    }

    /// Insert a burst of the given amplitude over one window.
    fn add_clap(signal: &mut [f32], at: usize, amplitude: f32) {
        let end = (at + 512).min(signal.len());
        for (i, s) in signal[at..end].iter_mut().enumerate() {
            *s = amplitude * (1.0 - i as f32 / 512.0);
        }
    }

    #[test]
    fn detects_a_single_clap() {
        let mut signal = quiet_bed(44100, 0.005);
        add_clap(&mut signal, 22016, 0.8);

        let events = detect_transients(&signal, SAMPLE_RATE, &TransientConfig::default());
        assert_eq!(events.len(), 1);

        let event = events[0];
        assert!(
            (event.sample_index as i32 - 22016).abs() < 1024,
            "event at {}",
            event.sample_index
        );
        assert!(event.peak_amplitude > 0.5);
        assert!(event.energy_ratio > 4.0);
    }

    #[test]
    fn silence_yields_no_events() {
        let silence = vec![0.0_f32; 88200];
        let events = detect_transients(&silence, SAMPLE_RATE, &TransientConfig::default());
        assert!(events.is_empty());
    }

    #[test]
    fn recorded_events_respect_min_interval() {
        let config = TransientConfig::default();
        let mut signal = quiet_bed(44100 * 3, 0.005);
        // Claps well clear of each other plus one inside the dead zone.
        add_clap(&mut signal, 30208, 0.9);
        add_clap(&mut signal, 33280, 0.9); // ~70 ms later, gated out
        add_clap(&mut signal, 70144, 0.9);

        let events = detect_transients(&signal, SAMPLE_RATE, &config);
        let min_samples = (config.min_interval_seconds * SAMPLE_RATE) as usize;
        for pair in events.windows(2) {
            assert!(
                pair[1].sample_index - pair[0].sample_index >= min_samples,
                "events at {} and {} too close",
                pair[0].sample_index,
                pair[1].sample_index
            );
        }
    }

    #[test]
    fn quiet_rejection_does_not_block_next_event() {
        // A burst loud relative to background but below min_amplitude is
        // suppressed; a real clap shortly after must still be recorded.
        let mut signal = quiet_bed(44100 * 2, 0.002);
        add_clap(&mut signal, 30208, 0.05); // below the 0.1 amplitude gate
        add_clap(&mut signal, 33280, 0.9); // within 0.3 s of the rejection

        let events = detect_transients(&signal, SAMPLE_RATE, &TransientConfig::default());
        assert_eq!(events.len(), 1, "the loud clap must survive");
        assert!(
            (events[0].sample_index as i32 - 33280).abs() < 1024,
            "event at {}",
            events[0].sample_index
        );
        assert!(events[0].peak_amplitude > 0.5);
    }

    #[test]
    fn extract_impulse_clamps_to_recording_end() {
        let signal: Vec<f32> = (0..44100).map(|i| i as f32 / 44100.0).collect();
        let event = TransientEvent {
            sample_index: 44100 - 1000,
            time_seconds: 0.0,
            peak_amplitude: 1.0,
            energy_ratio: 10.0,
        };
        let segment = extract_impulse(&signal, &event, 3.0, SAMPLE_RATE);
        assert_eq!(segment.len(), 1000);
    }

    #[test]
    fn extract_impulse_full_duration_when_available() {
        let signal = vec![0.1_f32; 44100 * 5];
        let event = TransientEvent {
            sample_index: 44100,
            time_seconds: 1.0,
            peak_amplitude: 1.0,
            energy_ratio: 10.0,
        };
        let segment = extract_impulse(&signal, &event, 3.0, SAMPLE_RATE);
        assert_eq!(segment.len(), 3 * 44100);
    }

    #[test]
    fn event_at_recording_tail_yields_empty_segment() {
        let signal = vec![0.1_f32; 1000];
        let event = TransientEvent {
            sample_index: 1000,
            time_seconds: 0.0,
            peak_amplitude: 1.0,
            energy_ratio: 10.0,
        };
        let segment = extract_impulse(&signal, &event, 3.0, SAMPLE_RATE);
        assert!(segment.is_empty());
    }

    #[test]
    fn config_round_trips_through_serde_with_defaults() {
        let config: TransientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TransientConfig::default());

        let json = serde_json::to_string(&TransientConfig::default()).unwrap();
        let back: TransientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TransientConfig::default());
    }
}
