//! Pitch estimation
//!
//! Two estimators work on every frame:
//! - Autocorrelation (time domain, gated) for the fundamental frequency
//! - Subharmonic summation (frequency domain) for the melody note
//!
//! A zero-crossing check discards autocorrelation estimates that are
//! implausibly low for the frame's crossing rate.

pub mod autocorrelation;
pub mod notes;
pub mod shs;
pub mod voicing;

pub use autocorrelation::{estimate_autocorrelation_pitch, AutocorrelationParams};
pub use notes::{frequency_to_note, note_name, note_to_frequency, pitch_class_name};
pub use shs::{ShsEstimate, SubharmonicSummation};
pub use voicing::{is_voiced, zero_crossing_rate, zero_crossings};

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

/// Fundamental-frequency estimate of one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchEstimate {
    /// Estimated fundamental in Hz
    pub frequency_hz: f32,
    /// Winning autocorrelation lag in samples
    pub lag: usize,
    /// Normalized autocorrelation at the winning lag (0.0-1.0)
    pub clarity: f32,
}

impl PitchEstimate {
    /// Fractional note number of the estimate
    pub fn note(&self) -> Option<f32> {
        frequency_to_note(self.frequency_hz)
    }
}

/// Autocorrelation pitch estimator with the optional voicing check
#[derive(Debug, Clone)]
pub struct PitchEstimator {
    params: AutocorrelationParams,
    sample_rate: u32,
    voicing_check: bool,
}

impl PitchEstimator {
    /// Build an estimator from the analysis configuration
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the configuration is invalid
    /// for `sample_rate`.
    pub fn new(config: &AnalysisConfig, sample_rate: u32) -> Result<Self, AnalysisError> {
        config.validate(sample_rate)?;
        Ok(Self {
            params: AutocorrelationParams::from(config),
            sample_rate,
            voicing_check: config.voicing_check,
        })
    }

    /// Estimate the pitch of one frame, `None` if unpitched or unvoiced
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for an empty frame.
    pub fn estimate(&self, frame: &[f32]) -> Result<Option<PitchEstimate>, AnalysisError> {
        let estimate = estimate_autocorrelation_pitch(frame, self.sample_rate, &self.params)?;
        Ok(estimate.filter(|e| {
            !self.voicing_check || is_voiced(frame, self.sample_rate, e.frequency_hz)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voicing_check_discards_noisy_frame() {
        // strong low-frequency component plus alternating high-frequency ripple
        let frame: Vec<f32> = (0..3200)
            .map(|i| {
                let t = i as f32 / 16000.0;
                let ripple = if i % 2 == 0 { 0.3 } else { -0.3 };
                0.6 * (2.0 * std::f32::consts::PI * 100.0 * t).sin() + ripple
            })
            .collect();

        let config = AnalysisConfig {
            autocorrelation_gate: None,
            voicing_check: true,
            ..AnalysisConfig::default()
        };
        let checked = PitchEstimator::new(&config, 16000).unwrap();
        assert!(checked.estimate(&frame).unwrap().is_none());

        let unchecked = PitchEstimator::new(
            &AnalysisConfig {
                voicing_check: false,
                ..config
            },
            16000,
        )
        .unwrap();
        let estimate = unchecked.estimate(&frame).unwrap().unwrap();
        assert!(estimate.frequency_hz < 8000.0);
    }

    #[test]
    fn test_estimate_note() {
        let estimate = PitchEstimate {
            frequency_hz: 440.0,
            lag: 36,
            clarity: 0.9,
        };
        assert!((estimate.note().unwrap() - 69.0).abs() < 1e-4);
    }
}
