//! Spectral analysis modules
//!
//! The shared front half of every analysis:
//! - Normalized Hann windowing with power-of-two zero padding
//! - Real-valued FFT over a half spectrum (forward and inverse)
//! - Short-time spectra and log-magnitude spectrograms
//! - Cepstral features and smoothed spectral envelopes

pub mod cepstrum;
pub mod stft;
pub mod transform;
pub mod window;

pub use cepstrum::{CepstralAnalyzer, Cepstrum, FeatureVector, SpectralEnvelope, CEPSTRAL_DIMENSIONS};
pub use stft::{spectrogram, Spectrogram, Stft};
pub use transform::{amplitude_to_db, fft_size_for, SpectralTransform, Spectrum, DB_FLOOR};
pub use window::{hann, WindowNormalization, Windower};
