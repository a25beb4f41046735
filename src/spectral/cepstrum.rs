//! Cepstral analysis
//!
//! Algorithm:
//! 1. Magnitude spectrum of the windowed frame
//! 2. Log-magnitude `L[k] = 20 * log10(|X[k]|)`, clamped at `DB_FLOOR`
//! 3. Zero-pad `L` to the next power of two and transform again → cepstrum
//! 4. Keep coefficients `0..13`, zero the rest
//! 5. Inverse-transform the truncated cepstrum → smoothed log envelope
//!
//! The real parts of the retained coefficients form the [`FeatureVector`] used
//! by the vowel classifier; the complex truncated cepstrum is only used to
//! rebuild the envelope.

use rayon::prelude::*;
use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::io::Framer;
use crate::spectral::stft::Stft;
use crate::spectral::transform::{fft_size_for, SpectralTransform};
use crate::spectral::window::WindowNormalization;

/// Number of low-order cepstral coefficients kept
pub const CEPSTRAL_DIMENSIONS: usize = 13;

/// Real cepstral feature vector (coefficients 0..12)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f32; CEPSTRAL_DIMENSIONS]);

impl FeatureVector {
    /// Coefficient values
    pub fn values(&self) -> &[f32; CEPSTRAL_DIMENSIONS] {
        &self.0
    }
}

impl AsRef<[f32]> for FeatureVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

impl From<[f32; CEPSTRAL_DIMENSIONS]> for FeatureVector {
    fn from(values: [f32; CEPSTRAL_DIMENSIONS]) -> Self {
        Self(values)
    }
}

/// Complex cepstrum in half-spectrum layout
#[derive(Debug, Clone, PartialEq)]
pub struct Cepstrum {
    coefficients: Vec<Complex<f32>>,
}

impl Cepstrum {
    /// Wrap cepstral coefficients
    pub fn new(coefficients: Vec<Complex<f32>>) -> Self {
        Self { coefficients }
    }

    /// Coefficients
    pub fn coefficients(&self) -> &[Complex<f32>] {
        &self.coefficients
    }

    /// Number of coefficients
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// True if there are no coefficients
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Copy with every coefficient at index `>= keep` set to zero
    pub fn truncated(&self, keep: usize) -> Cepstrum {
        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .map(|(i, &c)| if i < keep { c } else { Complex::new(0.0, 0.0) })
            .collect();
        Cepstrum { coefficients }
    }

    /// Real parts of coefficients `0..CEPSTRAL_DIMENSIONS`
    ///
    /// Missing coefficients (for very short cepstra) are zero.
    pub fn features(&self) -> FeatureVector {
        let mut values = [0.0f32; CEPSTRAL_DIMENSIONS];
        for (value, c) in values.iter_mut().zip(&self.coefficients) {
            *value = c.re;
        }
        FeatureVector(values)
    }
}

/// Log spectrum and its cepstrally smoothed envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectralEnvelope {
    /// Bin frequencies in Hz
    pub frequencies: Vec<f32>,
    /// Log-magnitude spectrum in dB
    pub log_spectrum: Vec<f32>,
    /// Envelope in dB, aligned with `frequencies`
    pub envelope: Vec<f32>,
}

impl SpectralEnvelope {
    /// `(frequency, envelope dB)` pairs for display
    pub fn points(&self) -> Vec<(f32, f32)> {
        self.frequencies
            .iter()
            .copied()
            .zip(self.envelope.iter().copied())
            .collect()
    }
}

/// Cepstral feature and envelope extraction for frames of a fixed size
#[derive(Debug, Clone)]
pub struct CepstralAnalyzer {
    stft: Stft,
    cepstral_transform: SpectralTransform,
}

impl CepstralAnalyzer {
    /// Build the analyzer for frames of `frame_size` samples
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `frame_size < 2` or the sample
    /// rate is zero.
    pub fn new(
        frame_size: usize,
        sample_rate: u32,
        normalization: WindowNormalization,
    ) -> Result<Self, AnalysisError> {
        let stft = Stft::new(frame_size, sample_rate, normalization)?;
        let cepstral_transform = SpectralTransform::new(fft_size_for(stft.fft_size() / 2 + 1))?;
        Ok(Self {
            stft,
            cepstral_transform,
        })
    }

    /// Frame length in samples
    pub fn frame_size(&self) -> usize {
        self.stft.frame_size()
    }

    /// Log-magnitude spectrum and full (untruncated) cepstrum of one frame
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` for a frame of the wrong length.
    pub fn cepstrum(&self, frame: &[f32]) -> Result<(Vec<f32>, Cepstrum), AnalysisError> {
        let log_spectrum = self.stft.spectrum(frame)?.log_magnitude_db();

        let mut padded = log_spectrum.clone();
        padded.resize(self.cepstral_transform.fft_size(), 0.0);
        let cepstrum = Cepstrum::new(self.cepstral_transform.forward(&padded)?.into_bins());

        Ok((log_spectrum, cepstrum))
    }

    /// Feature vector of one frame
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` for a frame of the wrong length.
    pub fn features(&self, frame: &[f32]) -> Result<FeatureVector, AnalysisError> {
        let (_, cepstrum) = self.cepstrum(frame)?;
        Ok(cepstrum.truncated(CEPSTRAL_DIMENSIONS).features())
    }

    /// Feature vectors of every frame of `samples`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the framer's frame size differs
    /// from the analyzer's.
    pub fn features_for_samples(
        &self,
        samples: &[f32],
        framer: &Framer,
    ) -> Result<Vec<FeatureVector>, AnalysisError> {
        if framer.frame_size() != self.frame_size() {
            return Err(AnalysisError::InvalidInput(format!(
                "Framer produces {} samples, analyzer expects {}",
                framer.frame_size(),
                self.frame_size()
            )));
        }

        let frames: Vec<_> = framer.frames(samples).collect();
        log::debug!("Extracting cepstral features from {} frames", frames.len());

        frames.par_iter().map(|frame| self.features(frame.samples)).collect()
    }

    /// Log spectrum and cepstral envelope of one frame
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` for a frame of the wrong length.
    pub fn envelope(&self, frame: &[f32]) -> Result<SpectralEnvelope, AnalysisError> {
        let (log_spectrum, cepstrum) = self.cepstrum(frame)?;
        let truncated = cepstrum.truncated(CEPSTRAL_DIMENSIONS);

        let smoothed = self.cepstral_transform.inverse(truncated.coefficients())?;
        let envelope = smoothed[..log_spectrum.len()].to_vec();
        let frequencies = (0..log_spectrum.len()).map(|k| self.stft.bin_frequency(k)).collect();

        Ok(SpectralEnvelope {
            frequencies,
            log_spectrum,
            envelope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vowel_like(f0: f32, formant: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        // harmonic series shaped by a single resonance
        (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (1..=20)
                    .map(|h| {
                        let f = f0 * h as f32;
                        let gain = 1.0 / (1.0 + ((f - formant) / 300.0).powi(2));
                        0.1 * gain * (2.0 * std::f32::consts::PI * f * t).sin()
                    })
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_truncation_idempotent() {
        let analyzer = CepstralAnalyzer::new(512, 16000, WindowNormalization::Sum).unwrap();
        let frame = vowel_like(150.0, 800.0, 16000, 512);
        let (_, cepstrum) = analyzer.cepstrum(&frame).unwrap();

        let once = cepstrum.truncated(CEPSTRAL_DIMENSIONS);
        let twice = once.truncated(CEPSTRAL_DIMENSIONS);
        assert_eq!(once, twice);
        assert!(once.coefficients()[CEPSTRAL_DIMENSIONS..]
            .iter()
            .all(|c| c.re == 0.0 && c.im == 0.0));
        assert_eq!(once.coefficients()[..CEPSTRAL_DIMENSIONS], cepstrum.coefficients()[..CEPSTRAL_DIMENSIONS]);
    }

    #[test]
    fn test_cepstrum_layout() {
        let analyzer = CepstralAnalyzer::new(3200, 16000, WindowNormalization::Sum).unwrap();
        let frame = vowel_like(120.0, 700.0, 16000, 3200);
        let (log_spectrum, cepstrum) = analyzer.cepstrum(&frame).unwrap();
        // 4096-point spectrum → 2049 bins → padded to 4096 → 2049 coefficients
        assert_eq!(log_spectrum.len(), 2049);
        assert_eq!(cepstrum.len(), 2049);
    }

    #[test]
    fn test_features_are_finite_for_silence() {
        let analyzer = CepstralAnalyzer::new(400, 16000, WindowNormalization::Sum).unwrap();
        let features = analyzer.features(&[0.0; 400]).unwrap();
        assert!(features.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_envelope_tracks_formant() {
        let analyzer = CepstralAnalyzer::new(3200, 16000, WindowNormalization::Sum).unwrap();
        let frame = vowel_like(120.0, 1000.0, 16000, 3200);
        let env = analyzer.envelope(&frame).unwrap();

        assert_eq!(env.envelope.len(), env.log_spectrum.len());
        assert_eq!(env.points().len(), 2049);
        assert!(env.envelope.iter().all(|v| v.is_finite()));

        let level_at = |hz: f32| {
            let k = (hz * 4096.0 / 16000.0).round() as usize;
            env.envelope[k]
        };
        assert!(level_at(1000.0) > level_at(5000.0));
    }

    #[test]
    fn test_features_for_samples_counts_frames() {
        let analyzer = CepstralAnalyzer::new(400, 16000, WindowNormalization::Sum).unwrap();
        let framer = Framer::new(400, 100).unwrap();
        let samples = vowel_like(200.0, 600.0, 16000, 2000);
        let features = analyzer.features_for_samples(&samples, &framer).unwrap();
        assert_eq!(features.len(), (2000 - 400) / 100);

        let wrong = Framer::new(256, 100).unwrap();
        assert!(analyzer.features_for_samples(&samples, &wrong).is_err());
    }
}
