//! Chord detection by template matching
//!
//! `score = a_root * chroma[r] + a_third * chroma[r + Δ3] + a_fifth * chroma[r + 7]`
//! for every triad; the highest score wins and ties go to the lower index.

use serde::{Deserialize, Serialize};

use super::{Chord, ChordTemplates};
use crate::features::chroma::ChromaVector;

/// Scores of all 24 triads for one chroma vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordScores {
    /// Scores in chord index order
    pub scores: Vec<f32>,
}

impl ChordScores {
    /// Score of one chord
    pub fn score(&self, chord: Chord) -> f32 {
        self.scores[chord.index()]
    }

    /// Highest-scoring chord (lowest index on ties)
    pub fn best(&self) -> Option<Chord> {
        crate::features::argmax(&self.scores).and_then(Chord::from_index)
    }

    /// All chords, highest score first (index order among equal scores)
    pub fn ranked(&self) -> Vec<(Chord, f32)> {
        let mut ranked: Vec<(Chord, f32)> = Chord::all().zip(self.scores.iter().copied()).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}

fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Score every triad against a chroma vector
pub fn score_chords(chroma: &ChromaVector, templates: &ChordTemplates) -> ChordScores {
    let scores = Chord::all()
        .map(|chord| dot_product(chroma.energies(), templates.template(chord)))
        .collect();
    ChordScores { scores }
}

/// Best triad for a chroma vector, `None` for a silent frame
///
/// # Example
///
/// ```
/// use tonal_dsp::features::chord::{detect_chord, Chord, ChordTemplates};
/// use tonal_dsp::features::chroma::ChromaVector;
///
/// let mut energies = [0.0; 12];
/// energies[9] = 1.0; // A
/// energies[0] = 0.6; // C
/// energies[4] = 0.8; // E
/// let chord = detect_chord(&ChromaVector(energies), &ChordTemplates::default());
/// assert_eq!(chord, Some(Chord::Minor(9)));
/// ```
pub fn detect_chord(chroma: &ChromaVector, templates: &ChordTemplates) -> Option<Chord> {
    if chroma.is_silent() {
        return None;
    }
    score_chords(chroma, templates).best()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChordWeights;

    fn chroma_of(notes: &[(usize, f32)]) -> ChromaVector {
        let mut energies = [0.0; 12];
        for &(pc, e) in notes {
            energies[pc] = e;
        }
        ChromaVector(energies)
    }

    #[test]
    fn test_triads_detected() {
        let templates = ChordTemplates::default();
        // G major: G, B, D
        let chroma = chroma_of(&[(7, 1.0), (11, 1.0), (2, 1.0)]);
        assert_eq!(detect_chord(&chroma, &templates), Some(Chord::Major(7)));

        // E minor: E, G, B
        let chroma = chroma_of(&[(4, 1.0), (7, 0.9), (11, 0.8)]);
        assert_eq!(detect_chord(&chroma, &templates), Some(Chord::Minor(4)));
    }

    #[test]
    fn test_silent_chroma_has_no_chord() {
        let templates = ChordTemplates::default();
        assert_eq!(detect_chord(&ChromaVector::default(), &templates), None);
        // scoring still works and every score is zero
        let scores = score_chords(&ChromaVector::default(), &templates);
        assert!(scores.scores.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        // flat chroma: every triad scores the same
        let templates = ChordTemplates::default();
        let scores = score_chords(&ChromaVector([1.0; 12]), &templates);
        assert_eq!(scores.best(), Some(Chord::Major(0)));
        assert_eq!(scores.ranked()[0].0, Chord::Major(0));
        assert_eq!(scores.ranked().len(), 24);
    }

    #[test]
    fn test_custom_weights() {
        // weighting only the third: a lone E reads as C major (first chord with E as major third)
        let templates = ChordTemplates::new(ChordWeights {
            root: 0.0,
            third: 1.0,
            fifth: 0.0,
        });
        let chroma = chroma_of(&[(4, 1.0)]);
        assert_eq!(detect_chord(&chroma, &templates), Some(Chord::Major(0)));
        let scores = score_chords(&chroma, &templates);
        assert_eq!(scores.score(Chord::Minor(1)), 1.0);
    }
}
