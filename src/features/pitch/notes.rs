//! Note number ↔ frequency conversion
//!
//! Equal temperament with A4 = 440 Hz at note number 69. Note numbers are
//! real-valued so that fractional grid points (e.g. 60.3) map to frequencies.

/// Reference frequency of note 69 (A4)
pub const A4_FREQUENCY_HZ: f32 = 440.0;

/// Note number of A4
pub const A4_NOTE: f32 = 69.0;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Frequency of a (possibly fractional) note number: `440 * 2^((n - 69) / 12)`
///
/// # Example
///
/// ```
/// use tonal_dsp::features::pitch::note_to_frequency;
///
/// assert!((note_to_frequency(69.0) - 440.0).abs() < 1e-3);
/// assert!((note_to_frequency(81.0) - 880.0).abs() < 1e-2);
/// ```
#[inline]
pub fn note_to_frequency(note: f32) -> f32 {
    A4_FREQUENCY_HZ * 2.0f32.powf((note - A4_NOTE) / 12.0)
}

/// Fractional note number of a frequency, `None` for non-positive input
pub fn frequency_to_note(frequency_hz: f32) -> Option<f32> {
    if frequency_hz.is_finite() && frequency_hz > 0.0 {
        Some(A4_NOTE + 12.0 * (frequency_hz / A4_FREQUENCY_HZ).log2())
    } else {
        None
    }
}

/// Name of a pitch class (0 = C .. 11 = B)
pub fn pitch_class_name(pitch_class: usize) -> &'static str {
    NOTE_NAMES[pitch_class % 12]
}

/// Name of the nearest note with its octave, e.g. `"A4"` for 69.0
pub fn note_name(note: f32) -> String {
    let nearest = note.round() as i32;
    let pitch_class = nearest.rem_euclid(12) as usize;
    let octave = nearest.div_euclid(12) - 1;
    format!("{}{}", NOTE_NAMES[pitch_class], octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_frequency_inverse() {
        for note in [36.0f32, 48.5, 60.0, 69.0, 71.3, 96.0] {
            let back = frequency_to_note(note_to_frequency(note)).unwrap();
            assert!((back - note).abs() < 1e-3, "{} -> {}", note, back);
        }
        assert!((note_to_frequency(60.0) - 261.626).abs() < 0.01);
    }

    #[test]
    fn test_frequency_to_note_rejects_non_positive() {
        assert_eq!(frequency_to_note(0.0), None);
        assert_eq!(frequency_to_note(-10.0), None);
        assert_eq!(frequency_to_note(f32::NAN), None);
    }

    #[test]
    fn test_note_names() {
        assert_eq!(note_name(69.0), "A4");
        assert_eq!(note_name(60.0), "C4");
        assert_eq!(note_name(61.2), "C#4");
        assert_eq!(note_name(35.6), "C2");
        assert_eq!(note_name(11.0), "B-1");
        assert_eq!(pitch_class_name(13), "C#");
    }
}
