//! Configuration parameters for spectral analysis

use crate::error::AnalysisError;
use crate::spectral::window::WindowNormalization;

/// Largest frame accepted by [`AnalysisConfig::validate`], in samples (2^24)
pub const MAX_FRAME_SIZE: usize = 1 << 24;

/// Weights applied to the root, third and fifth of a triad when scoring chords
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChordWeights {
    /// Weight of the root pitch class (default: 1.0)
    pub root: f32,
    /// Weight of the third (major or minor) (default: 0.5)
    pub third: f32,
    /// Weight of the perfect fifth (default: 0.8)
    pub fifth: f32,
}

impl Default for ChordWeights {
    fn default() -> Self {
        Self {
            root: 1.0,
            third: 0.5,
            fifth: 0.8,
        }
    }
}

/// Analysis configuration parameters
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // Framing
    /// Frame duration in seconds (default: 0.2)
    pub frame_duration: f32,

    /// Shift between successive frames in seconds (default: 0.025, frame / 8)
    pub shift_duration: f32,

    /// Hann window normalization convention (default: Sum)
    pub window_normalization: WindowNormalization,

    // Autocorrelation pitch
    /// Noise gate for the autocorrelation sum (default: Some(0.1))
    /// Products where either sample magnitude is below the gate are dropped.
    /// Values between 0.04 and 0.2 are reasonable depending on the input level.
    pub autocorrelation_gate: Option<f32>,

    /// Smallest lag considered by the autocorrelation search (default: 10)
    pub min_lag: usize,

    /// Lower bound of reported pitch in Hz (default: 0.0)
    pub min_frequency_hz: f32,

    /// Upper bound of reported pitch in Hz (default: None = Nyquist)
    pub max_frequency_hz: Option<f32>,

    /// Discard pitch estimates whose zero-crossing rate exceeds twice the
    /// estimated frequency (default: false)
    /// Tones with strong upper harmonics cross zero several times per period,
    /// so enabling this also drops most voiced musical frames.
    pub voicing_check: bool,

    // Subharmonic summation
    /// Lowest candidate note number of the SHS grid (default: 36.0, C2)
    pub shs_lowest_note: f32,

    /// Width of the SHS search grid in semitones (default: 36.0)
    pub shs_semitone_span: f32,

    /// Grid step in semitones (default: 0.1)
    pub shs_resolution: f32,

    /// Number of harmonics summed per candidate (default: 5)
    pub shs_harmonics: usize,

    /// Maximum distance between a harmonic and a bin frequency in Hz (default: 10.0)
    pub shs_tolerance_hz: f32,

    /// Summed magnitude below which a frame is treated as unvoiced (default: 0.005)
    pub shs_energy_floor: f32,

    // Chords
    /// Triad weights (default: root 1.0, third 0.5, fifth 0.8)
    pub chord_weights: ChordWeights,

    // Vowel classification
    /// Minimum variance kept per dimension after training (default: 1e-6)
    pub variance_floor: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_duration: 0.2,
            shift_duration: 0.025,
            window_normalization: WindowNormalization::Sum,
            autocorrelation_gate: Some(0.1),
            min_lag: 10,
            min_frequency_hz: 0.0,
            max_frequency_hz: None,
            voicing_check: false,
            shs_lowest_note: 36.0,
            shs_semitone_span: 36.0,
            shs_resolution: 0.1,
            shs_harmonics: 5,
            shs_tolerance_hz: 10.0,
            shs_energy_floor: 0.005,
            chord_weights: ChordWeights::default(),
            variance_floor: 1e-6,
        }
    }
}

impl AnalysisConfig {
    /// Frame length in samples: `round(frame_duration * sample_rate)`
    pub fn frame_size(&self, sample_rate: u32) -> usize {
        (self.frame_duration * sample_rate as f32).round() as usize
    }

    /// Shift length in samples: `round(shift_duration * sample_rate)`
    pub fn shift_size(&self, sample_rate: u32) -> usize {
        (self.shift_duration * sample_rate as f32).round() as usize
    }

    /// Number of candidates on the SHS note grid
    pub fn shs_candidate_count(&self) -> usize {
        (self.shs_semitone_span / self.shs_resolution).round() as usize
    }

    /// Check the configuration against a sample rate
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if any duration, bound or grid
    /// parameter is out of range for `sample_rate`, including frames longer
    /// than [`MAX_FRAME_SIZE`] samples.
    pub fn validate(&self, sample_rate: u32) -> Result<(), AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Invalid sample rate: 0".to_string(),
            ));
        }

        if !is_positive(self.frame_duration) || !is_positive(self.shift_duration) {
            return Err(AnalysisError::InvalidInput(format!(
                "Frame and shift durations must be positive, got {} s / {} s",
                self.frame_duration, self.shift_duration
            )));
        }

        let frame_samples = self.frame_duration as f64 * sample_rate as f64;
        if frame_samples.round() > MAX_FRAME_SIZE as f64 {
            return Err(AnalysisError::InvalidInput(format!(
                "Frame of {} s at {} Hz exceeds the maximum of {} samples",
                self.frame_duration, sample_rate, MAX_FRAME_SIZE
            )));
        }

        let frame_size = self.frame_size(sample_rate);
        if frame_size < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "Frame of {} s at {} Hz holds {} samples, need at least 2",
                self.frame_duration, sample_rate, frame_size
            )));
        }

        if self.shift_size(sample_rate) == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Shift of {} s at {} Hz rounds to 0 samples",
                self.shift_duration, sample_rate
            )));
        }

        if let Some(gate) = self.autocorrelation_gate {
            if !gate.is_finite() || gate < 0.0 {
                return Err(AnalysisError::InvalidInput(format!(
                    "Autocorrelation gate must be non-negative, got {}",
                    gate
                )));
            }
        }

        if self.min_lag == 0 {
            return Err(AnalysisError::InvalidInput(
                "Minimum lag must be > 0".to_string(),
            ));
        }

        if self.min_frequency_hz < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "min_frequency_hz must be non-negative: {}",
                self.min_frequency_hz
            )));
        }

        if let Some(max) = self.max_frequency_hz {
            if max <= self.min_frequency_hz {
                return Err(AnalysisError::InvalidInput(format!(
                    "max_frequency_hz must be larger than min_frequency_hz: min = {}, max = {}",
                    self.min_frequency_hz, max
                )));
            }
        }

        if !is_positive(self.shs_resolution) || !is_positive(self.shs_semitone_span) {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid SHS grid: span {} semitones, step {}",
                self.shs_semitone_span, self.shs_resolution
            )));
        }

        if self.shs_harmonics == 0 {
            return Err(AnalysisError::InvalidInput(
                "SHS needs at least one harmonic".to_string(),
            ));
        }

        if !is_positive(self.shs_tolerance_hz) {
            return Err(AnalysisError::InvalidInput(format!(
                "SHS tolerance must be positive, got {} Hz",
                self.shs_tolerance_hz
            )));
        }

        if !is_positive(self.variance_floor) {
            return Err(AnalysisError::InvalidInput(format!(
                "Variance floor must be positive, got {}",
                self.variance_floor
            )));
        }

        Ok(())
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
