//! Weighted triad templates
//!
//! A template puts the root, third and fifth weights on the three chord tones
//! and zero elsewhere, so scoring a chroma vector is a 12-element dot product.

use crate::config::ChordWeights;

use super::Chord;

/// Templates for all 24 triads
#[derive(Debug, Clone)]
pub struct ChordTemplates {
    templates: [[f32; 12]; Chord::COUNT],
    weights: ChordWeights,
}

impl ChordTemplates {
    /// Build templates from triad weights
    pub fn new(weights: ChordWeights) -> Self {
        let mut templates = [[0.0f32; 12]; Chord::COUNT];
        for chord in Chord::all() {
            let root = chord.root();
            let template = &mut templates[chord.index()];
            template[root] += weights.root;
            template[(root + chord.third_interval()) % 12] += weights.third;
            template[(root + 7) % 12] += weights.fifth;
        }
        Self { templates, weights }
    }

    /// Template of one chord
    pub fn template(&self, chord: Chord) -> &[f32; 12] {
        &self.templates[chord.index()]
    }

    /// Weights the templates were built from
    pub fn weights(&self) -> ChordWeights {
        self.weights
    }
}

impl Default for ChordTemplates {
    fn default() -> Self {
        Self::new(ChordWeights::default())
    }
}
