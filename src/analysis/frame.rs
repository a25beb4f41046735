//! Per-frame analysis
//!
//! One [`FrameAnalyzer`] holds everything that depends only on the frame size
//! and sample rate (window, transform plan, SHS grid, chroma bands, chord
//! templates) and turns a raw frame into a [`FrameAnalysis`]. It is immutable
//! and shared across worker threads by the batch pipeline.

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::chord::{detect_chord, ChordTemplates};
use crate::features::chroma::ChromaAggregator;
use crate::features::loudness::rms_db;
use crate::features::pitch::{PitchEstimator, SubharmonicSummation};
use crate::io::Framer;
use crate::spectral::Stft;

use super::result::FrameAnalysis;

/// Frame-level feature extraction for one configuration and sample rate
#[derive(Debug, Clone)]
pub struct FrameAnalyzer {
    framer: Framer,
    stft: Stft,
    pitch: PitchEstimator,
    shs: SubharmonicSummation,
    chroma: ChromaAggregator,
    templates: ChordTemplates,
}

impl FrameAnalyzer {
    /// Build the analyzer
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the configuration is invalid
    /// for `sample_rate`.
    pub fn new(config: &AnalysisConfig, sample_rate: u32) -> Result<Self, AnalysisError> {
        config.validate(sample_rate)?;
        let framer = Framer::new(config.frame_size(sample_rate), config.shift_size(sample_rate))?;
        let stft = Stft::new(framer.frame_size(), sample_rate, config.window_normalization)?;

        Ok(Self {
            pitch: PitchEstimator::new(config, sample_rate)?,
            shs: SubharmonicSummation::new(config, sample_rate, stft.fft_size())?,
            chroma: ChromaAggregator::new(sample_rate, stft.fft_size())?,
            templates: ChordTemplates::new(config.chord_weights),
            framer,
            stft,
        })
    }

    /// Framing used by this analyzer
    pub fn framer(&self) -> &Framer {
        &self.framer
    }

    /// Transform length
    pub fn fft_size(&self) -> usize {
        self.stft.fft_size()
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.stft.sample_rate()
    }

    /// Analyze one frame starting at sample `position`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` if the frame length differs
    /// from the configured frame size.
    pub fn analyze(&self, frame: &[f32], position: usize) -> Result<FrameAnalysis, AnalysisError> {
        let magnitudes = self.stft.spectrum(frame)?.magnitudes();
        let chroma = self.chroma.aggregate(&magnitudes)?;

        Ok(FrameAnalysis {
            time: position as f32 / self.sample_rate() as f32,
            pitch: self.pitch.estimate(frame)?,
            melody: self.shs.estimate(&magnitudes)?,
            chord: detect_chord(&chroma, &self.templates),
            chroma,
            loudness_db: rms_db(frame),
        })
    }
}
