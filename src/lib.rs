//! # Tonal DSP
//!
//! Short-time spectral analysis of mono audio: pitch tracking, chroma and
//! chord recognition, and cepstral vowel classification.
//!
//! ## Features
//!
//! - **Pitch**: gated time-domain autocorrelation with an optional zero-crossing voicing
//!   check, plus subharmonic summation over a note grid for the melody
//! - **Chords**: chroma aggregation over five octaves and 24 weighted triad templates
//! - **Vowels**: 13 cepstral coefficients per frame and a diagonal Gaussian
//!   classifier with a text parameter dump
//! - **Spectra**: Hann-windowed real FFT, log-magnitude spectrogram, cepstral
//!   spectral envelope
//!
//! ## Quick Start
//!
//! ```
//! use tonal_dsp::{analyze_audio, AnalysisConfig};
//!
//! // one second of A4 with two overtones
//! let samples: Vec<f32> = (0..16000)
//!     .map(|i| {
//!         let t = i as f32 / 16000.0;
//!         [440.0f32, 880.0, 1320.0]
//!             .iter()
//!             .map(|f| 0.3 * (2.0 * std::f32::consts::PI * f * t).sin())
//!             .sum()
//!     })
//!     .collect();
//!
//! let result = analyze_audio(&samples, 16000, AnalysisConfig::default())?;
//! for (time, note) in result.melody_track() {
//!     assert!((note - 69.0).abs() <= 0.11, "{:.3}s: {}", time, note);
//! }
//! # Ok::<(), tonal_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Waveform → Framer → Windower → SpectralTransform → magnitude / log spectrum
//!                                                   ├→ CepstralAnalyzer → VowelClassifier
//!                                                   ├→ ChromaAggregator → ChordScorer
//!                                                   └→ SHS melody
//!          → autocorrelation pitch, loudness (time domain)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod ml;
pub mod spectral;

// Re-export main types
pub use analysis::result::{AnalysisMetadata, AnalysisResult, FrameAnalysis};
pub use analysis::FrameAnalyzer;
pub use config::{AnalysisConfig, ChordWeights};
pub use error::AnalysisError;
pub use features::chord::Chord;
pub use io::Waveform;
pub use ml::{GaussianModel, Vowel, VowelClassifier, VowelTrainer};

use rayon::prelude::*;

/// Main analysis function
///
/// Frames the samples and extracts, for every frame, the autocorrelation
/// pitch, the SHS melody note, chroma energies, the best chord and the RMS
/// loudness. Frames are processed in parallel; results are in time order.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `AnalysisResult` with one `FrameAnalysis` per frame and metadata. A signal
/// shorter than one frame yields no frames.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for empty or non-finite samples, a
/// zero sample rate or an invalid configuration.
pub fn analyze_audio(
    samples: &[f32],
    sample_rate: u32,
    config: AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!("Starting audio analysis: {} samples at {} Hz", samples.len(), sample_rate);

    let waveform = Waveform::new(samples.to_vec(), sample_rate)?;
    let analyzer = FrameAnalyzer::new(&config, sample_rate)?;
    let framer = *analyzer.framer();

    let frames: Vec<_> = framer.frames(waveform.samples()).collect();
    if frames.is_empty() {
        log::warn!(
            "Signal of {} samples is shorter than one frame ({} samples)",
            waveform.len(),
            framer.frame_size()
        );
    }

    log::debug!(
        "Analyzing {} frames: frame={}, shift={}, fft={}",
        frames.len(),
        framer.frame_size(),
        framer.shift_size(),
        analyzer.fft_size()
    );

    let results = frames
        .par_iter()
        .map(|frame| analyzer.analyze(frame.samples, frame.position))
        .collect::<Result<Vec<_>, _>>()?;

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;
    log::debug!("Analysis finished in {:.1} ms", processing_time_ms);

    Ok(AnalysisResult {
        metadata: AnalysisMetadata {
            duration_seconds: waveform.duration_seconds(),
            sample_rate,
            frame_size: framer.frame_size(),
            shift_size: framer.shift_size(),
            fft_size: analyzer.fft_size(),
            frame_count: results.len(),
            processing_time_ms,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        frames: results,
    })
}
