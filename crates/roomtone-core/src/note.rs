//! 12-tone equal-temperament conversion between frequencies and notes.

use libm::{exp2f, log2f, roundf};

/// Reference tuning frequency for A4.
pub const A4_HZ: f32 = 440.0;

/// MIDI note number of A4.
pub const A4_MIDI: i32 = 69;

/// Note names in chromatic order starting from C.
const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A musical note with its deviation from equal temperament.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Note name without octave, e.g. `"A#"`.
    pub name: &'static str,
    /// Scientific pitch octave (A4 is octave 4).
    pub octave: i32,
    /// MIDI note number.
    pub midi: i32,
    /// Deviation from the tempered pitch in cents, in [-50, 50].
    pub cents: f32,
    /// The tempered frequency of the note itself, in Hz.
    pub exact_frequency: f32,
}

/// Tempered frequency of a MIDI note number.
#[inline]
pub fn note_frequency(midi: i32) -> f32 {
    A4_HZ * exp2f((midi - A4_MIDI) as f32 / 12.0)
}

/// Find the nearest tempered note for a frequency.
///
/// Returns `None` for zero, negative, or non-finite frequencies.
pub fn frequency_to_note(hz: f32) -> Option<Note> {
    if !hz.is_finite() || hz <= 0.0 {
        return None;
    }

    let midi_real = A4_MIDI as f32 + 12.0 * log2f(hz / A4_HZ);
    let midi = roundf(midi_real) as i32;
    let cents = (midi_real - midi as f32) * 100.0;

    Some(Note {
        name: NOTE_NAMES[midi.rem_euclid(12) as usize],
        octave: midi.div_euclid(12) - 1,
        midi,
        cents,
        exact_frequency: note_frequency(midi),
    })
}

/// Frequency of a note, including its cent deviation.
///
/// With `cents == 0.0` this returns [`Note::exact_frequency`] bit-exactly,
/// since both sides evaluate the same tempered-frequency expression.
pub fn note_to_frequency(note: &Note) -> f32 {
    note_frequency(note.midi) * exp2f(note.cents / 1200.0)
}
