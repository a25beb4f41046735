//! Short-time spectra
//!
//! Window → pad → forward transform for one frame, and the log-magnitude
//! spectrogram of a whole waveform.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::io::{Framer, Waveform};
use crate::spectral::transform::{SpectralTransform, Spectrum};
use crate::spectral::window::{WindowNormalization, Windower};

/// Windowed spectrum of single frames
#[derive(Debug, Clone)]
pub struct Stft {
    windower: Windower,
    transform: SpectralTransform,
    sample_rate: u32,
}

impl Stft {
    /// Build the window and transform for frames of `frame_size` samples
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
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Invalid sample rate: 0".to_string(),
            ));
        }
        let windower = Windower::new(frame_size, normalization)?;
        let transform = SpectralTransform::new(windower.fft_size())?;
        Ok(Self {
            windower,
            transform,
            sample_rate,
        })
    }

    /// Frame length in samples
    pub fn frame_size(&self) -> usize {
        self.windower.frame_size()
    }

    /// Transform length
    pub fn fft_size(&self) -> usize {
        self.transform.fft_size()
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frequency of bin `k` in Hz
    pub fn bin_frequency(&self, k: usize) -> f32 {
        k as f32 * self.sample_rate as f32 / self.fft_size() as f32
    }

    /// Spectrum of one frame
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` if the frame length differs
    /// from `frame_size`.
    pub fn spectrum(&self, frame: &[f32]) -> Result<Spectrum, AnalysisError> {
        let windowed = self.windower.apply(frame)?;
        self.transform.forward(&windowed)
    }
}

/// Log-magnitude spectrogram (frame × bin, dB)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spectrogram {
    /// Start time of each frame in seconds
    pub times: Vec<f32>,
    /// Frequency of each bin in Hz
    pub frequencies: Vec<f32>,
    /// `20 * log10(|X|)` per frame and bin, floored at `DB_FLOOR`
    pub log_magnitudes: Vec<Vec<f32>>,
}

/// Compute the log-magnitude spectrogram of a waveform
///
/// # Errors
///
/// Returns `AnalysisError` if the configuration is invalid for the waveform's
/// sample rate.
pub fn spectrogram(waveform: &Waveform, config: &AnalysisConfig) -> Result<Spectrogram, AnalysisError> {
    let sample_rate = waveform.sample_rate();
    config.validate(sample_rate)?;

    let framer = Framer::new(config.frame_size(sample_rate), config.shift_size(sample_rate))?;
    let stft = Stft::new(framer.frame_size(), sample_rate, config.window_normalization)?;
    let count = framer.frame_count(waveform.len());

    log::debug!(
        "Computing spectrogram: {} frames, frame={}, shift={}, fft={}",
        count,
        framer.frame_size(),
        framer.shift_size(),
        stft.fft_size()
    );

    let frames: Vec<_> = framer.frames(waveform.samples()).collect();
    let log_magnitudes = frames
        .par_iter()
        .map(|frame| stft.spectrum(frame.samples).map(|s| s.log_magnitude_db()))
        .collect::<Result<Vec<_>, _>>()?;

    let times = (0..count).map(|i| framer.frame_time(i, sample_rate)).collect();
    let frequencies = (0..stft.fft_size() / 2 + 1).map(|k| stft.bin_frequency(k)).collect();

    Ok(Spectrogram {
        times,
        frequencies,
        log_magnitudes,
    })
}
