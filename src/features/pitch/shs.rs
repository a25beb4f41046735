//! Subharmonic summation (SHS) melody estimation
//!
//! Each candidate note `n` on a fixed grid is scored by summing the spectrum
//! magnitudes that lie near its first `H` harmonics:
//!
//! ```text
//! score(n) = Σ_h Σ_k |X[k]|    where |f(n) * h - freq(k)| < tolerance
//! ```
//!
//! The best-scoring candidate is the melody note of the frame. Scores below an
//! energy floor mean the frame is unvoiced.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

use super::notes::note_to_frequency;

/// Best SHS candidate of one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShsEstimate {
    /// Fractional note number (69.0 = A4)
    pub note: f32,
    /// Fundamental frequency of the note in Hz
    pub frequency_hz: f32,
    /// Summed harmonic magnitude
    pub score: f32,
}

/// Subharmonic summation over a note grid, for spectra of one FFT size
#[derive(Debug, Clone)]
pub struct SubharmonicSummation {
    notes: Vec<f32>,
    /// Bin ranges contributing to each candidate, one range per harmonic
    bins: Vec<Vec<(usize, usize)>>,
    bin_count: usize,
    energy_floor: f32,
}

impl SubharmonicSummation {
    /// Build the candidate grid for spectra of `fft_size` at `sample_rate`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the configuration is invalid
    /// for `sample_rate` or `fft_size` is zero.
    pub fn new(config: &AnalysisConfig, sample_rate: u32, fft_size: usize) -> Result<Self, AnalysisError> {
        config.validate(sample_rate)?;
        if fft_size == 0 {
            return Err(AnalysisError::InvalidInput("FFT size must be > 0".to_string()));
        }

        let bin_count = fft_size / 2 + 1;
        let bin_width = sample_rate as f32 / fft_size as f32;
        let tolerance = config.shs_tolerance_hz;

        let notes: Vec<f32> = (0..config.shs_candidate_count())
            .map(|i| config.shs_lowest_note + i as f32 * config.shs_resolution)
            .collect();

        let bins: Vec<Vec<(usize, usize)>> = notes
            .iter()
            .map(|&note| {
                let f0 = note_to_frequency(note);
                (1..=config.shs_harmonics)
                    .filter_map(|h| {
                        let target = f0 * h as f32;
                        let lo = ((target - tolerance) / bin_width).floor().max(0.0) as usize;
                        let hi = (((target + tolerance) / bin_width).ceil() as usize).min(bin_count - 1);
                        // strict tolerance on the exact bin frequencies
                        let lo = (lo..=hi).find(|&k| (target - k as f32 * bin_width).abs() < tolerance)?;
                        let hi = (lo..=hi)
                            .rev()
                            .find(|&k| (target - k as f32 * bin_width).abs() < tolerance)?;
                        Some((lo, hi + 1))
                    })
                    .collect()
            })
            .collect();

        log::debug!(
            "SHS grid: {} candidates from note {:.1}, {} harmonics, ±{} Hz",
            notes.len(),
            config.shs_lowest_note,
            config.shs_harmonics,
            tolerance
        );

        Ok(Self {
            notes,
            bins,
            bin_count,
            energy_floor: config.shs_energy_floor,
        })
    }

    /// Candidate note numbers
    pub fn notes(&self) -> &[f32] {
        &self.notes
    }

    /// Score every candidate against a magnitude spectrum
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` if the spectrum does not
    /// have the bin count of this grid's FFT size.
    pub fn scores(&self, magnitudes: &[f32]) -> Result<Vec<f32>, AnalysisError> {
        if magnitudes.len() != self.bin_count {
            return Err(AnalysisError::InvalidInputLength(format!(
                "SHS expects {} bins, got {}",
                self.bin_count,
                magnitudes.len()
            )));
        }

        Ok(self
            .bins
            .iter()
            .map(|ranges| {
                ranges
                    .iter()
                    .map(|&(lo, hi)| magnitudes[lo..hi].iter().sum::<f32>())
                    .sum()
            })
            .collect())
    }

    /// Best candidate, or `None` if its score is below the energy floor
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` for a spectrum of the wrong size.
    pub fn estimate(&self, magnitudes: &[f32]) -> Result<Option<ShsEstimate>, AnalysisError> {
        let scores = self.scores(magnitudes)?;
        let Some(best) = crate::features::argmax(&scores) else {
            return Ok(None);
        };

        let score = scores[best];
        if score < self.energy_floor {
            return Ok(None);
        }

        let note = self.notes[best];
        Ok(Some(ShsEstimate {
            note,
            frequency_hz: note_to_frequency(note),
            score,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::{Stft, WindowNormalization};

    fn partials(freqs: &[f32], amplitude: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                freqs
                    .iter()
                    .map(|f| amplitude * (2.0 * std::f32::consts::PI * f * t).sin())
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_grid_layout() {
        let shs = SubharmonicSummation::new(&AnalysisConfig::default(), 16000, 4096).unwrap();
        assert_eq!(shs.notes().len(), 360);
        assert!((shs.notes()[0] - 36.0).abs() < 1e-6);
        assert!((shs.notes()[359] - 71.9).abs() < 1e-3);
    }

    #[test]
    fn test_harmonic_series_at_a4() {
        let config = AnalysisConfig::default();
        let stft = Stft::new(3200, 16000, WindowNormalization::Sum).unwrap();
        let shs = SubharmonicSummation::new(&config, 16000, stft.fft_size()).unwrap();

        let frame = partials(&[440.0, 880.0, 1320.0], 0.3, 16000, 3200);
        let magnitudes = stft.spectrum(&frame).unwrap().magnitudes();
        let estimate = shs.estimate(&magnitudes).unwrap().unwrap();

        assert!((estimate.note - 69.0).abs() <= 0.1 + 1e-3, "note {}", estimate.note);
        assert!(estimate.score > 0.005);
    }

    #[test]
    fn test_silence_is_unvoiced() {
        let shs = SubharmonicSummation::new(&AnalysisConfig::default(), 16000, 4096).unwrap();
        assert_eq!(shs.estimate(&vec![0.0; 2049]).unwrap(), None);
        assert!(shs.scores(&vec![0.0; 2048]).is_err());
    }

    #[test]
    fn test_single_bin_scores() {
        // one bin at 440 Hz: every candidate with a harmonic within 10 Hz of it scores 1
        let mut magnitudes = vec![0.0; 2049];
        let k = (440.0f32 * 4096.0 / 16000.0).round() as usize;
        magnitudes[k] = 1.0;

        let shs = SubharmonicSummation::new(&AnalysisConfig::default(), 16000, 4096).unwrap();
        let scores = shs.scores(&magnitudes).unwrap();
        assert!(scores.iter().all(|&s| s == 0.0 || s == 1.0));
        // the lowest matching candidate wins the tie
        let best = shs.estimate(&magnitudes).unwrap().unwrap();
        let first = scores.iter().position(|&s| s == 1.0).unwrap();
        assert_eq!(best.note, shs.notes()[first]);
    }
}
