//! Chord recognition
//!
//! Score the 24 major and minor triads against a chroma vector:
//! - Weighted triad templates (root, third, fifth)
//! - Template matching with a lowest-index tie-break

pub mod detector;
pub mod templates;

pub use detector::{detect_chord, score_chords, ChordScores};
pub use templates::ChordTemplates;

use serde::{Deserialize, Serialize};

use crate::features::pitch::pitch_class_name;

/// Major or minor triad on a root pitch class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chord {
    /// Major triad (0 = C, 1 = C#, ..., 11 = B)
    Major(u32),
    /// Minor triad (0 = C, 1 = C#, ..., 11 = B)
    Minor(u32),
}

impl Chord {
    /// Number of chord hypotheses
    pub const COUNT: usize = 24;

    /// Chord for a flat index: 0..11 = C..B major, 12..23 = C..B minor
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0..=11 => Some(Chord::Major(index as u32)),
            12..=23 => Some(Chord::Minor(index as u32 - 12)),
            _ => None,
        }
    }

    /// Flat index of the chord
    pub fn index(&self) -> usize {
        match self {
            Chord::Major(r) => *r as usize % 12,
            Chord::Minor(r) => 12 + *r as usize % 12,
        }
    }

    /// Root pitch class
    pub fn root(&self) -> usize {
        match self {
            Chord::Major(r) | Chord::Minor(r) => *r as usize % 12,
        }
    }

    /// Semitones from root to third (4 for major, 3 for minor)
    pub fn third_interval(&self) -> usize {
        match self {
            Chord::Major(_) => 4,
            Chord::Minor(_) => 3,
        }
    }

    /// Chord name, e.g. "C", "F#", "Am"
    ///
    /// # Example
    ///
    /// ```
    /// use tonal_dsp::features::chord::Chord;
    ///
    /// assert_eq!(Chord::Major(0).name(), "C");
    /// assert_eq!(Chord::Minor(9).name(), "Am");
    /// assert_eq!(Chord::from_index(13).map(|c| c.name()), Some("C#m".to_string()));
    /// ```
    pub fn name(&self) -> String {
        match self {
            Chord::Major(_) => pitch_class_name(self.root()).to_string(),
            Chord::Minor(_) => format!("{}m", pitch_class_name(self.root())),
        }
    }

    /// All 24 chords in index order
    pub fn all() -> impl Iterator<Item = Chord> {
        (0..Self::COUNT).filter_map(Chord::from_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_index_layout() {
        assert_eq!(Chord::from_index(0), Some(Chord::Major(0)));
        assert_eq!(Chord::from_index(11), Some(Chord::Major(11)));
        assert_eq!(Chord::from_index(12), Some(Chord::Minor(0)));
        assert_eq!(Chord::from_index(23), Some(Chord::Minor(11)));
        assert_eq!(Chord::from_index(24), None);

        for (i, chord) in Chord::all().enumerate() {
            assert_eq!(chord.index(), i);
        }
    }

    #[test]
    fn test_chord_names() {
        assert_eq!(Chord::Major(6).name(), "F#");
        assert_eq!(Chord::Minor(0).name(), "Cm");
        assert_eq!(Chord::Minor(11).name(), "Bm");
    }
}
