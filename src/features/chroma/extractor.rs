//! Chroma vector extraction
//!
//! For pitch class `c` (0 = C) and octave offset `m ∈ {-2, ..., 2}`, the
//! centre frequency is `base = f(60 + c) * 2^m`. Every bin whose frequency lies
//! in `[base / 2^(1/30), base * 2^(1/30)]` contributes its magnitude; the class
//! energy is the mean magnitude over all contributing bins of all five octaves.
//! A class with no contributing bin has energy 0.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::features::pitch::note_to_frequency;

/// Value shown for a pitch class with zero energy on the display scale
pub const CHROMA_DISPLAY_SENTINEL: f32 = -2147483648.0;

const OCTAVE_OFFSETS: std::ops::RangeInclusive<i32> = -2..=2;

/// 12 raw pitch-class energies, index 0 = C .. 11 = B
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChromaVector(pub [f32; 12]);

impl ChromaVector {
    /// Energies
    pub fn energies(&self) -> &[f32; 12] {
        &self.0
    }

    /// Energy of one pitch class (wraps modulo 12)
    pub fn get(&self, pitch_class: usize) -> f32 {
        self.0[pitch_class % 12]
    }

    /// True if every energy is zero
    pub fn is_silent(&self) -> bool {
        self.0.iter().all(|&e| e <= 0.0)
    }

    /// Strongest pitch class (first on ties), `None` for a silent vector
    pub fn dominant(&self) -> Option<usize> {
        if self.is_silent() {
            return None;
        }
        crate::features::argmax(&self.0)
    }

    /// Display scale `-0.15 / energy`
    ///
    /// Zero energies map to [`CHROMA_DISPLAY_SENTINEL`]. For plotting only;
    /// chord scoring uses the raw energies.
    pub fn display_scale(&self) -> [f32; 12] {
        self.0.map(|e| {
            if e > 0.0 {
                -0.15 / e
            } else {
                CHROMA_DISPLAY_SENTINEL
            }
        })
    }
}

/// Pitch-class aggregation for spectra of one FFT size
#[derive(Debug, Clone)]
pub struct ChromaAggregator {
    /// Contributing bin indices per pitch class
    bands: Vec<Vec<usize>>,
    bin_count: usize,
}

impl ChromaAggregator {
    /// Precompute the bins of each pitch class for `fft_size` at `sample_rate`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the sample rate or FFT size is zero.
    pub fn new(sample_rate: u32, fft_size: usize) -> Result<Self, AnalysisError> {
        if sample_rate == 0 || fft_size == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid chroma parameters: sample_rate={}, fft_size={}",
                sample_rate, fft_size
            )));
        }

        let bin_count = fft_size / 2 + 1;
        let bin_width = sample_rate as f32 / fft_size as f32;
        let half_width = 2.0f32.powf(1.0 / 30.0);

        let bands: Vec<Vec<usize>> = (0..12)
            .map(|c| {
                let mut bins = Vec::new();
                for m in OCTAVE_OFFSETS {
                    let base = note_to_frequency(60.0 + c as f32) * 2.0f32.powi(m);
                    let (lo, hi) = (base / half_width, base * half_width);
                    let first = (lo / bin_width).ceil() as usize;
                    bins.extend(
                        (first..bin_count).take_while(|&k| k as f32 * bin_width <= hi),
                    );
                }
                bins
            })
            .collect();

        log::debug!(
            "Chroma bands for fft={} at {} Hz: {:?} bins per class",
            fft_size,
            sample_rate,
            bands.iter().map(Vec::len).collect::<Vec<_>>()
        );

        Ok(Self { bands, bin_count })
    }

    /// Number of bins contributing to a pitch class
    pub fn band_size(&self, pitch_class: usize) -> usize {
        self.bands[pitch_class % 12].len()
    }

    /// Chroma energies of one magnitude spectrum
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` if the spectrum does not
    /// have `fft_size / 2 + 1` bins.
    pub fn aggregate(&self, magnitudes: &[f32]) -> Result<ChromaVector, AnalysisError> {
        if magnitudes.len() != self.bin_count {
            return Err(AnalysisError::InvalidInputLength(format!(
                "Chroma expects {} bins, got {}",
                self.bin_count,
                magnitudes.len()
            )));
        }

        let mut chroma = [0.0f32; 12];
        for (energy, band) in chroma.iter_mut().zip(&self.bands) {
            if !band.is_empty() {
                let sum: f32 = band.iter().map(|&k| magnitudes[k]).sum();
                *energy = sum / band.len() as f32;
            }
        }
        Ok(ChromaVector(chroma))
    }
}
