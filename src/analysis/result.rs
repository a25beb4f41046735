//! Analysis result types

use serde::{Deserialize, Serialize};

pub use super::metadata::AnalysisMetadata;
use crate::features::chord::Chord;
use crate::features::chroma::ChromaVector;
use crate::features::pitch::{PitchEstimate, ShsEstimate};

/// Features of one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    /// Frame start time in seconds
    pub time: f32,

    /// Autocorrelation pitch (`None` if unpitched or rejected by the voicing check)
    pub pitch: Option<PitchEstimate>,

    /// Subharmonic-summation melody note (`None` if unvoiced)
    pub melody: Option<ShsEstimate>,

    /// Raw pitch-class energies
    pub chroma: ChromaVector,

    /// Best triad (`None` for silent frames)
    pub chord: Option<Chord>,

    /// RMS level in dBFS
    pub loudness_db: f32,
}

/// Complete analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Per-frame features in time order
    pub frames: Vec<FrameAnalysis>,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// `(time, pitch Hz)` for every pitched frame
    pub fn pitch_track(&self) -> Vec<(f32, f32)> {
        self.frames
            .iter()
            .filter_map(|f| f.pitch.map(|p| (f.time, p.frequency_hz)))
            .collect()
    }

    /// `(time, note number)` for every voiced frame
    pub fn melody_track(&self) -> Vec<(f32, f32)> {
        self.frames
            .iter()
            .filter_map(|f| f.melody.map(|m| (f.time, m.note)))
            .collect()
    }

    /// `(time, chord index)` for every non-silent frame
    pub fn chord_track(&self) -> Vec<(f32, usize)> {
        self.frames
            .iter()
            .filter_map(|f| f.chord.map(|c| (f.time, c.index())))
            .collect()
    }

    /// Chroma energies per frame
    pub fn chroma_matrix(&self) -> Vec<[f32; 12]> {
        self.frames.iter().map(|f| f.chroma.0).collect()
    }

    /// `(time, dBFS)` for every frame
    pub fn loudness_track(&self) -> Vec<(f32, f32)> {
        self.frames.iter().map(|f| (f.time, f.loudness_db)).collect()
    }
}
