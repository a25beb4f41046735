//! Vowel recognition from cepstral features
//!
//! Training collects labeled [`FeatureVector`]s per vowel in a
//! [`VowelTrainer`]; [`VowelTrainer::train`] consumes it and returns an
//! immutable [`VowelClassifier`], so an untrained classifier cannot be used.
//!
//! # Example
//!
//! ```no_run
//! use tonal_dsp::io::Waveform;
//! use tonal_dsp::ml::{VowelTrainer, Vowel};
//! use tonal_dsp::AnalysisConfig;
//!
//! # let recording = vec![0.0f32; 16000 * 6];
//! let config = AnalysisConfig::default();
//! let training = Waveform::new(recording, 16000)?;
//!
//! // a, i, u, e, o spoken in sequence between these times (seconds)
//! let mut trainer = VowelTrainer::new(&config, 16000)?;
//! trainer.add_segments(&training, &[1.1, 2.1, 2.8, 3.66, 4.59, 5.9])?;
//! let classifier = trainer.train()?;
//! classifier.model().save("param.txt")?;
//!
//! for result in classifier.classify_waveform(&training)? {
//!     println!("{:.3} {:?}", result.time, result.vowel);
//! }
//! # Ok::<(), tonal_dsp::AnalysisError>(())
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::gaussian::GaussianModel;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::io::{Framer, Waveform};
use crate::spectral::{CepstralAnalyzer, FeatureVector, CEPSTRAL_DIMENSIONS};

/// The five vowel classes, in class-index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vowel {
    /// /a/
    A,
    /// /i/
    I,
    /// /u/
    U,
    /// /e/
    E,
    /// /o/
    O,
}

impl Vowel {
    /// All vowels in class-index order
    pub const ALL: [Vowel; 5] = [Vowel::A, Vowel::I, Vowel::U, Vowel::E, Vowel::O];

    /// Class index (a = 0 .. o = 4)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Vowel for a class index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lower-case letter
    pub fn symbol(self) -> char {
        match self {
            Vowel::A => 'a',
            Vowel::I => 'i',
            Vowel::U => 'u',
            Vowel::E => 'e',
            Vowel::O => 'o',
        }
    }
}

/// Predicted vowel of one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Frame start time in seconds
    pub time: f32,
    /// Most likely vowel
    pub vowel: Vowel,
}

/// Frame feature extraction shared by trainer and classifier
#[derive(Debug, Clone)]
struct FeatureExtractor {
    analyzer: CepstralAnalyzer,
    framer: Framer,
    sample_rate: u32,
}

impl FeatureExtractor {
    fn new(config: &AnalysisConfig, sample_rate: u32) -> Result<Self, AnalysisError> {
        config.validate(sample_rate)?;
        let framer = Framer::new(config.frame_size(sample_rate), config.shift_size(sample_rate))?;
        let analyzer = CepstralAnalyzer::new(framer.frame_size(), sample_rate, config.window_normalization)?;
        Ok(Self {
            analyzer,
            framer,
            sample_rate,
        })
    }

    fn check_rate(&self, waveform: &Waveform) -> Result<(), AnalysisError> {
        if waveform.sample_rate() != self.sample_rate {
            return Err(AnalysisError::InvalidInput(format!(
                "Waveform sample rate {} Hz, expected {} Hz",
                waveform.sample_rate(),
                self.sample_rate
            )));
        }
        Ok(())
    }
}

/// Collects labeled feature vectors for the five vowels
#[derive(Debug, Clone)]
pub struct VowelTrainer {
    extractor: FeatureExtractor,
    variance_floor: f32,
    features: [Vec<FeatureVector>; 5],
}

impl VowelTrainer {
    /// Create a trainer with the framing and variance floor of `config`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the configuration is invalid
    /// for `sample_rate`.
    pub fn new(config: &AnalysisConfig, sample_rate: u32) -> Result<Self, AnalysisError> {
        Ok(Self {
            extractor: FeatureExtractor::new(config, sample_rate)?,
            variance_floor: config.variance_floor,
            features: Default::default(),
        })
    }

    /// Add one precomputed feature vector
    pub fn add_features(&mut self, vowel: Vowel, features: FeatureVector) {
        self.features[vowel.index()].push(features);
    }

    /// Add one frame of samples
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` if the frame length differs
    /// from the configured frame size.
    pub fn add_frame(&mut self, vowel: Vowel, frame: &[f32]) -> Result<(), AnalysisError> {
        let features = self.extractor.analyzer.features(frame)?;
        self.add_features(vowel, features);
        Ok(())
    }

    /// Add every frame of a segment of samples; returns the number of frames added
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError` if feature extraction fails.
    pub fn add_segment(&mut self, vowel: Vowel, samples: &[f32]) -> Result<usize, AnalysisError> {
        let features = self
            .extractor
            .analyzer
            .features_for_samples(samples, &self.extractor.framer)?;
        let count = features.len();
        if count == 0 {
            log::warn!(
                "Segment for /{}/ holds {} samples, shorter than one frame",
                vowel.symbol(),
                samples.len()
            );
        }
        self.features[vowel.index()].extend(features);
        Ok(count)
    }

    /// Add five consecutive segments of one recording, spoken in the order
    /// a, i, u, e, o
    ///
    /// `boundaries` are six increasing times in seconds; segment `k` spans
    /// `[boundaries[k], boundaries[k + 1])`.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the boundaries are not
    /// increasing or the sample rate differs from the trainer's.
    pub fn add_segments(&mut self, waveform: &Waveform, boundaries: &[f32; 6]) -> Result<(), AnalysisError> {
        self.extractor.check_rate(waveform)?;
        if boundaries[0] < 0.0
            || boundaries
                .windows(2)
                .any(|w| w[0].partial_cmp(&w[1]) != Some(std::cmp::Ordering::Less)) {
            return Err(AnalysisError::InvalidInput(format!(
                "Segment boundaries must be non-negative and increasing: {:?}",
                boundaries
            )));
        }

        for (vowel, span) in Vowel::ALL.iter().zip(boundaries.windows(2)) {
            let segment = waveform.segment(span[0], span[1]);
            let count = self.add_segment(*vowel, segment)?;
            log::debug!(
                "/{}/: {:.2}-{:.2} s, {} frames",
                vowel.symbol(),
                span[0],
                span[1],
                count
            );
        }
        Ok(())
    }

    /// Number of training vectors collected for a vowel
    pub fn frame_count(&self, vowel: Vowel) -> usize {
        self.features[vowel.index()].len()
    }

    /// Fit the Gaussian model
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if any vowel has no training frames.
    pub fn train(self) -> Result<VowelClassifier, AnalysisError> {
        let model = GaussianModel::train(&self.features, self.variance_floor)?;
        Ok(VowelClassifier {
            model,
            extractor: self.extractor,
        })
    }
}

/// Trained vowel classifier
#[derive(Debug, Clone)]
pub struct VowelClassifier {
    model: GaussianModel,
    extractor: FeatureExtractor,
}

impl VowelClassifier {
    /// Wrap a model (e.g. one read from a parameter dump)
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the model does not have five
    /// classes of cepstral dimension, or the configuration is invalid.
    pub fn from_model(
        model: GaussianModel,
        config: &AnalysisConfig,
        sample_rate: u32,
    ) -> Result<Self, AnalysisError> {
        if model.class_count() != Vowel::ALL.len() || model.dimensions() != CEPSTRAL_DIMENSIONS {
            return Err(AnalysisError::InvalidInput(format!(
                "Vowel model needs {} classes of {} dimensions, got {} of {}",
                Vowel::ALL.len(),
                CEPSTRAL_DIMENSIONS,
                model.class_count(),
                model.dimensions()
            )));
        }
        Ok(Self {
            model,
            extractor: FeatureExtractor::new(config, sample_rate)?,
        })
    }

    /// Underlying Gaussian model
    pub fn model(&self) -> &GaussianModel {
        &self.model
    }

    /// Classify one feature vector
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::NumericalError` if the likelihoods are not comparable.
    pub fn classify_features(&self, features: &FeatureVector) -> Result<Vowel, AnalysisError> {
        let class = self.model.classify(features.as_ref())?;
        Vowel::from_index(class).ok_or_else(|| {
            AnalysisError::NumericalError(format!("Class index {} out of range", class))
        })
    }

    /// Classify one frame of samples
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInputLength` for a frame of the wrong length.
    pub fn classify_frame(&self, frame: &[f32]) -> Result<Vowel, AnalysisError> {
        let features = self.extractor.analyzer.features(frame)?;
        self.classify_features(&features)
    }

    /// Classify every frame of a waveform
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the sample rate differs from
    /// the classifier's.
    pub fn classify_waveform(&self, waveform: &Waveform) -> Result<Vec<ClassificationResult>, AnalysisError> {
        self.extractor.check_rate(waveform)?;
        let framer = &self.extractor.framer;

        let frames: Vec<_> = framer.frames(waveform.samples()).collect();
        log::debug!("Classifying {} frames", frames.len());

        frames
            .par_iter()
            .map(|frame| {
                Ok(ClassificationResult {
                    time: framer.frame_time(frame.index, waveform.sample_rate()),
                    vowel: self.classify_frame(frame.samples)?,
                })
            })
            .collect()
    }
}
