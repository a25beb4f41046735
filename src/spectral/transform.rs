//! Real-valued FFT over a half spectrum
//!
//! A real input of length `N = 2^p` has a Hermitian spectrum, so only the
//! `N/2 + 1` non-redundant bins are kept. The inverse rebuilds the mirrored
//! half and returns a real signal scaled by `1/N`, so that
//! `inverse(forward(x)) == x`.
//!
//! The forward transform is not scaled; amplitude normalization belongs to the
//! caller (see [`super::window::Windower`]).
//!
//! # Example
//!
//! ```
//! use tonal_dsp::spectral::SpectralTransform;
//!
//! let transform = SpectralTransform::new(8)?;
//! let signal = [1.0, 0.5, -0.25, 0.0, 0.75, -1.0, 0.0, 0.25];
//! let spectrum = transform.forward(&signal)?;
//! assert_eq!(spectrum.len(), 5);
//!
//! let restored = transform.inverse(spectrum.bins())?;
//! for (a, b) in signal.iter().zip(&restored) {
//!     assert!((a - b).abs() < 1e-5);
//! }
//! # Ok::<(), tonal_dsp::AnalysisError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::AnalysisError;

/// Magnitudes below this value are clamped before taking a logarithm
pub const MAGNITUDE_FLOOR: f32 = 1e-10;

/// Level reported for a zero magnitude: `20 * log10(MAGNITUDE_FLOOR)`
pub const DB_FLOOR: f32 = -200.0;

/// Smallest power of two holding `len` samples
pub fn fft_size_for(len: usize) -> usize {
    len.max(1).next_power_of_two()
}

/// Amplitude in dB, `20 * log10(magnitude)`, with zero mapped to [`DB_FLOOR`]
#[inline]
pub fn amplitude_to_db(magnitude: f32) -> f32 {
    20.0 * magnitude.max(MAGNITUDE_FLOOR).log10()
}

/// Half spectrum of a real signal
///
/// Bin `k` maps to frequency `k * sample_rate / fft_size`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    bins: Vec<Complex<f32>>,
    fft_size: usize,
}

impl Spectrum {
    /// Wrap `fft_size / 2 + 1` bins
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` if `fft_size` is not a power
    /// of two or the bin count does not match it.
    pub fn from_bins(bins: Vec<Complex<f32>>, fft_size: usize) -> Result<Self, AnalysisError> {
        check_fft_size(fft_size)?;
        if bins.len() != fft_size / 2 + 1 {
            return Err(AnalysisError::InvalidInputLength(format!(
                "Half spectrum of FFT size {} needs {} bins, got {}",
                fft_size,
                fft_size / 2 + 1,
                bins.len()
            )));
        }
        Ok(Self { bins, fft_size })
    }

    /// Complex bins
    pub fn bins(&self) -> &[Complex<f32>] {
        &self.bins
    }

    /// Transform length the bins were produced from
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of bins (`fft_size / 2 + 1`)
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// True if the spectrum has no bins
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Frequency of bin `k` in Hz
    #[inline]
    pub fn bin_frequency(&self, k: usize, sample_rate: u32) -> f32 {
        k as f32 * sample_rate as f32 / self.fft_size as f32
    }

    /// Magnitude `|X[k]|` of every bin
    pub fn magnitudes(&self) -> Vec<f32> {
        self.bins.iter().map(|c| c.norm()).collect()
    }

    /// `20 * log10(|X[k]|)` of every bin, zero magnitudes clamped to [`DB_FLOOR`]
    pub fn log_magnitude_db(&self) -> Vec<f32> {
        self.bins.iter().map(|c| amplitude_to_db(c.norm())).collect()
    }

    /// Consume the spectrum, returning its bins
    pub fn into_bins(self) -> Vec<Complex<f32>> {
        self.bins
    }
}

/// Forward/inverse real FFT of one power-of-two size
///
/// Plans are built once and shared; `forward` and `inverse` take `&self`, so a
/// transform can be used from many threads at once.
#[derive(Clone)]
pub struct SpectralTransform {
    fft_size: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl fmt::Debug for SpectralTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralTransform")
            .field("fft_size", &self.fft_size)
            .finish()
    }
}

impl SpectralTransform {
    /// Plan a transform of `fft_size` points
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` unless `fft_size` is a power
    /// of two and at least 2.
    pub fn new(fft_size: usize) -> Result<Self, AnalysisError> {
        check_fft_size(fft_size)?;

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(fft_size);
        let inverse = planner.plan_fft_inverse(fft_size);

        Ok(Self {
            fft_size,
            forward,
            inverse,
        })
    }

    /// Transform length
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of bins in the half spectrum
    pub fn half_size(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Forward transform of a real signal of exactly `fft_size` samples
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` if `input.len() != fft_size`;
    /// callers pad first.
    pub fn forward(&self, input: &[f32]) -> Result<Spectrum, AnalysisError> {
        if input.len() != self.fft_size {
            return Err(AnalysisError::InvalidInputLength(format!(
                "Forward transform expects {} samples, got {}",
                self.fft_size,
                input.len()
            )));
        }

        let mut buffer: Vec<Complex<f32>> = input.iter().map(|&x| Complex::new(x, 0.0)).collect();
        self.forward.process(&mut buffer);
        buffer.truncate(self.half_size());

        Ok(Spectrum {
            bins: buffer,
            fft_size: self.fft_size,
        })
    }

    /// Inverse transform of a half spectrum back to `fft_size` real samples
    ///
    /// The imaginary parts of the DC and Nyquist bins are ignored, as Hermitian
    /// symmetry forces them to zero.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` if `bins.len() != fft_size / 2 + 1`.
    pub fn inverse(&self, bins: &[Complex<f32>]) -> Result<Vec<f32>, AnalysisError> {
        let half = self.half_size();
        if bins.len() != half {
            return Err(AnalysisError::InvalidInputLength(format!(
                "Inverse transform expects {} bins, got {}",
                half,
                bins.len()
            )));
        }

        let n = self.fft_size;
        let mut buffer = vec![Complex::new(0.0f32, 0.0); n];
        buffer[..half].copy_from_slice(bins);
        buffer[0].im = 0.0;
        buffer[n / 2].im = 0.0;
        for k in 1..n / 2 {
            buffer[n - k] = bins[k].conj();
        }

        self.inverse.process(&mut buffer);

        let scale = 1.0 / n as f32;
        Ok(buffer.iter().map(|c| c.re * scale).collect())
    }
}

fn check_fft_size(fft_size: usize) -> Result<(), AnalysisError> {
    if fft_size < 2 || !fft_size.is_power_of_two() {
        return Err(AnalysisError::InvalidInputLength(format!(
            "FFT size must be a power of two >= 2, got {}",
            fft_size
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fft_size_for() {
        assert_eq!(fft_size_for(3200), 4096);
        assert_eq!(fft_size_for(4096), 4096);
        assert_eq!(fft_size_for(2049), 4096);
        assert_eq!(fft_size_for(2), 2);
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        assert!(matches!(
            SpectralTransform::new(3200),
            Err(AnalysisError::InvalidInputLength(_))
        ));
        assert!(SpectralTransform::new(1).is_err());

        let transform = SpectralTransform::new(16).unwrap();
        assert!(transform.forward(&[0.0; 15]).is_err());
        assert!(transform.inverse(&[Complex::new(0.0, 0.0); 8]).is_err());
    }

    #[test]
    fn test_round_trip_padded_signal() {
        let original: Vec<f32> = (0..300).map(|i| ((i * 7 % 23) as f32 - 11.0) / 11.0).collect();
        let fft_size = fft_size_for(original.len());
        let mut padded = original.clone();
        padded.resize(fft_size, 0.0);

        let transform = SpectralTransform::new(fft_size).unwrap();
        let spectrum = transform.forward(&padded).unwrap();
        assert_eq!(spectrum.len(), fft_size / 2 + 1);

        let restored = transform.inverse(spectrum.bins()).unwrap();
        assert_eq!(restored.len(), fft_size);
        for (i, (a, b)) in padded.iter().zip(&restored).enumerate() {
            assert!((a - b).abs() < 1e-4, "sample {}: {} vs {}", i, a, b);
        }
    }

    #[test]
    fn test_sine_peak_bin() {
        // bin 8 of a 64-point transform
        let n = 64;
        let signal: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * 8.0 * i as f32 / n as f32).cos())
            .collect();
        let transform = SpectralTransform::new(n).unwrap();
        let magnitudes = transform.forward(&signal).unwrap().magnitudes();

        assert!((magnitudes[8] - n as f32 / 2.0).abs() < 1e-3);
        assert!(magnitudes[7] < 1e-3);
        assert!(magnitudes[9] < 1e-3);
    }

    #[test]
    fn test_log_magnitude_floor() {
        let transform = SpectralTransform::new(32).unwrap();
        let spectrum = transform.forward(&[0.0; 32]).unwrap();
        let db = spectrum.log_magnitude_db();
        assert!(db.iter().all(|v| v.is_finite()));
        assert!(db.iter().all(|&v| (v - DB_FLOOR).abs() < 1e-3));
    }

    #[test]
    fn test_bin_frequency() {
        let bins = vec![Complex::new(0.0, 0.0); 2049];
        let spectrum = Spectrum::from_bins(bins, 4096).unwrap();
        assert!((spectrum.bin_frequency(2048, 16000) - 8000.0).abs() < 1e-3);
        assert!(Spectrum::from_bins(vec![Complex::new(0.0, 0.0); 10], 4096).is_err());
    }
}
