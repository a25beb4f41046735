//! Normalized Hann windowing
//!
//! Window values follow the raised-cosine formula `0.5 - 0.5*cos(2πn/(N-1))`
//! and are scaled so that either their sum or their sum of squares is 1.0.
//! With the default sum normalization, a sinusoid of amplitude `A` peaks at
//! about `A/2` in the spectrum regardless of the frame length.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::spectral::transform::fft_size_for;

/// Window normalization convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowNormalization {
    /// Coefficients sum to 1.0
    Sum,
    /// Squared coefficients sum to 1.0
    Energy,
}

/// Raw (unnormalized) Hann window of `len` samples
pub fn hann(len: usize) -> Vec<f32> {
    if len < 2 {
        return vec![1.0; len];
    }
    let denom = (len - 1) as f64;
    (0..len)
        .map(|n| (0.5 - 0.5 * (2.0 * std::f64::consts::PI * n as f64 / denom).cos()) as f32)
        .collect()
}

/// Applies a normalized Hann window and zero-pads to the transform size
#[derive(Debug, Clone)]
pub struct Windower {
    coefficients: Vec<f32>,
    fft_size: usize,
    normalization: WindowNormalization,
}

impl Windower {
    /// Build a window for frames of `frame_size` samples
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `frame_size < 2`.
    pub fn new(frame_size: usize, normalization: WindowNormalization) -> Result<Self, AnalysisError> {
        if frame_size < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "Window needs at least 2 samples, got {}",
                frame_size
            )));
        }

        // A two-point Hann window is all zeros; fall back to a flat window.
        let mut raw = hann(frame_size);
        if raw.iter().all(|&w| w == 0.0) {
            raw.iter_mut().for_each(|w| *w = 1.0);
        }
        let norm: f64 = match normalization {
            WindowNormalization::Sum => raw.iter().map(|&w| w as f64).sum(),
            WindowNormalization::Energy => raw.iter().map(|&w| (w as f64) * (w as f64)).sum::<f64>().sqrt(),
        };
        let coefficients = raw.iter().map(|&w| (w as f64 / norm) as f32).collect();

        Ok(Self {
            coefficients,
            fft_size: fft_size_for(frame_size),
            normalization,
        })
    }

    /// Normalized window coefficients
    pub fn coefficients(&self) -> &[f32] {
        &self.coefficients
    }

    /// Frame length the window applies to
    pub fn frame_size(&self) -> usize {
        self.coefficients.len()
    }

    /// Padded output length (next power of two of the frame size)
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Normalization convention in use
    pub fn normalization(&self) -> WindowNormalization {
        self.normalization
    }

    /// Window `frame` and append zeros up to `fft_size`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` if the frame length differs
    /// from the window length.
    pub fn apply(&self, frame: &[f32]) -> Result<Vec<f32>, AnalysisError> {
        if frame.len() != self.coefficients.len() {
            return Err(AnalysisError::InvalidInputLength(format!(
                "Window of {} samples applied to frame of {}",
                self.coefficients.len(),
                frame.len()
            )));
        }

        let mut out = Vec::with_capacity(self.fft_size);
        out.extend(frame.iter().zip(&self.coefficients).map(|(x, w)| x * w));
        out.resize(self.fft_size, 0.0);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_endpoints_and_peak() {
        let w = hann(5);
        assert!(w[0].abs() < 1e-7);
        assert!(w[4].abs() < 1e-7);
        assert!((w[2] - 1.0).abs() < 1e-7);
        assert!((w[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sum_normalization() {
        for len in [2usize, 3, 17, 400, 3200] {
            let windower = Windower::new(len, WindowNormalization::Sum).unwrap();
            let sum: f32 = windower.coefficients().iter().sum();
            assert!((sum - 1.0).abs() < 1e-4, "len {}: sum {}", len, sum);
        }
    }

    #[test]
    fn test_energy_normalization() {
        for len in [2usize, 9, 1024, 3200] {
            let windower = Windower::new(len, WindowNormalization::Energy).unwrap();
            let energy: f32 = windower.coefficients().iter().map(|w| w * w).sum();
            assert!((energy - 1.0).abs() < 1e-4, "len {}: energy {}", len, energy);
        }
    }

    #[test]
    fn test_apply_pads_to_power_of_two() {
        let windower = Windower::new(3200, WindowNormalization::Sum).unwrap();
        let frame = vec![1.0f32; 3200];
        let out = windower.apply(&frame).unwrap();
        assert_eq!(out.len(), 4096);
        assert!(out[3200..].iter().all(|&x| x == 0.0));
        assert_eq!(&out[..3200], windower.coefficients());
    }

    #[test]
    fn test_apply_rejects_wrong_length() {
        let windower = Windower::new(64, WindowNormalization::Sum).unwrap();
        assert!(matches!(
            windower.apply(&[0.0; 63]),
            Err(AnalysisError::InvalidInputLength(_))
        ));
        assert!(Windower::new(1, WindowNormalization::Sum).is_err());
    }
}
