//! Time-domain autocorrelation pitch estimation
//!
//! # Algorithm
//!
//! For a frame `x` of `F` samples and lag `t`:
//!
//! ```text
//! r[t] = Σ x[j] * x[j + t]    for j + t < F - 1
//! ```
//!
//! With a noise gate `g`, a product is dropped when `|x[j]| < g` or
//! `|x[j + t]| < g`, so low-level noise does not build up a spurious
//! periodicity. The lag with the largest `r[t]` (first one on ties) gives
//! `pitch = sample_rate / t`. A frame whose best `r[t]` is not positive has no
//! pitch.
//!
//! Lags start at `min_lag` and stop before `F - 1`; optional frequency bounds
//! narrow that range further.

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

use super::PitchEstimate;

/// Parameters of the autocorrelation search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutocorrelationParams {
    /// Noise gate on sample magnitude (`None` disables it)
    pub gate: Option<f32>,
    /// Smallest lag searched
    pub min_lag: usize,
    /// Lowest reportable frequency in Hz (0 = no bound)
    pub min_frequency_hz: f32,
    /// Highest reportable frequency in Hz (`None` = no bound)
    pub max_frequency_hz: Option<f32>,
}

impl Default for AutocorrelationParams {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for AutocorrelationParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            gate: config.autocorrelation_gate,
            min_lag: config.min_lag,
            min_frequency_hz: config.min_frequency_hz,
            max_frequency_hz: config.max_frequency_hz,
        }
    }
}

impl AutocorrelationParams {
    /// Half-open lag range `[lo, hi)` searched for a frame of `frame_size` samples
    pub fn lag_range(&self, frame_size: usize, sample_rate: u32) -> (usize, usize) {
        let sr = sample_rate as f32;
        let mut lo = self.min_lag;
        let mut hi = frame_size.saturating_sub(1);

        if let Some(max_hz) = self.max_frequency_hz {
            if max_hz > 0.0 {
                lo = lo.max((sr / max_hz).ceil() as usize);
            }
        }
        if self.min_frequency_hz > 0.0 {
            hi = hi.min((sr / self.min_frequency_hz).floor() as usize + 1);
        }

        (lo, hi.max(lo))
    }
}

/// Gated autocorrelation of `frame` at one lag
pub fn autocorrelation_at(frame: &[f32], lag: usize, gate: Option<f32>) -> f32 {
    let end = frame.len().saturating_sub(1);
    if lag >= end {
        return 0.0;
    }

    let pairs = frame[..end - lag].iter().zip(&frame[lag..end]);
    match gate {
        Some(g) => pairs
            .filter(|(a, b)| a.abs() >= g && b.abs() >= g)
            .map(|(a, b)| a * b)
            .sum(),
        None => pairs.map(|(a, b)| a * b).sum(),
    }
}

/// Autocorrelation over a lag range `[lo, hi)`
pub fn autocorrelation(frame: &[f32], lags: (usize, usize), gate: Option<f32>) -> Vec<f32> {
    (lags.0..lags.1)
        .map(|t| autocorrelation_at(frame, t, gate))
        .collect()
}

/// Estimate the pitch of one frame
///
/// # Arguments
///
/// * `frame` - Time-domain samples (unwindowed)
/// * `sample_rate` - Sample rate in Hz
/// * `params` - Gate, minimum lag and frequency bounds
///
/// # Returns
///
/// `Some(PitchEstimate)` with frequency, lag and clarity `r[t*] / r[0]`, or
/// `None` if the lag range is empty or no lag correlates positively.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty frame or a zero sample rate.
///
/// # Example
///
/// ```
/// use tonal_dsp::features::pitch::{estimate_autocorrelation_pitch, AutocorrelationParams};
///
/// let frame: Vec<f32> = (0..3200)
///     .map(|i| 0.8 * (2.0 * std::f32::consts::PI * 200.0 * i as f32 / 16000.0).sin())
///     .collect();
/// let estimate = estimate_autocorrelation_pitch(&frame, 16000, &AutocorrelationParams::default())?
///     .expect("periodic frame");
/// assert!((estimate.frequency_hz - 200.0).abs() < 5.0);
/// # Ok::<(), tonal_dsp::AnalysisError>(())
/// ```
pub fn estimate_autocorrelation_pitch(
    frame: &[f32],
    sample_rate: u32,
    params: &AutocorrelationParams,
) -> Result<Option<PitchEstimate>, AnalysisError> {
    if frame.is_empty() {
        return Err(AnalysisError::InvalidInput("Empty frame".to_string()));
    }
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    let (lo, hi) = params.lag_range(frame.len(), sample_rate);
    if lo >= hi {
        log::debug!(
            "Empty lag range [{}, {}) for frame of {} samples",
            lo,
            hi,
            frame.len()
        );
        return Ok(None);
    }

    let correlations = autocorrelation(frame, (lo, hi), params.gate);
    let Some(best) = crate::features::argmax(&correlations) else {
        return Ok(None);
    };

    let peak = correlations[best];
    if peak <= 0.0 {
        return Ok(None);
    }

    let lag = lo + best;
    let energy = autocorrelation_at(frame, 0, params.gate);
    let clarity = if energy > 0.0 { peak / energy } else { 0.0 };

    Ok(Some(PitchEstimate {
        frequency_hz: sample_rate as f32 / lag as f32,
        lag,
        clarity,
    }))
}
