//! Mono waveform container

use crate::error::AnalysisError;

/// Immutable mono waveform with its sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Create a waveform from already-decoded mono samples
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the buffer is empty, the sample
    /// rate is zero or any sample is NaN or infinite.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AnalysisError> {
        if samples.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "Empty audio samples".to_string(),
            ));
        }

        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Invalid sample rate".to_string(),
            ));
        }

        if let Some(pos) = samples.iter().position(|s| !s.is_finite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "Non-finite sample at index {}",
                pos
            )));
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Sample values
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed waveform; present for API symmetry
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Nyquist frequency in Hz
    pub fn nyquist(&self) -> f32 {
        self.sample_rate as f32 * 0.5
    }

    /// Samples between two times in seconds (clamped to the waveform)
    ///
    /// Used to cut labeled segments out of a longer recording.
    pub fn segment(&self, start_seconds: f32, end_seconds: f32) -> &[f32] {
        let rate = self.sample_rate as f32;
        let start = ((start_seconds.max(0.0) * rate).round() as usize).min(self.samples.len());
        let end = ((end_seconds.max(0.0) * rate).round() as usize).min(self.samples.len());
        if end <= start {
            return &[];
        }
        &self.samples[start..end]
    }
}
