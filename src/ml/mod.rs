//! Statistical classification
//!
//! - Diagonal Gaussian class models with a text parameter dump
//! - Vowel trainer and classifier over cepstral features

pub mod gaussian;
pub mod vowel;

pub use gaussian::{ClassModel, GaussianModel};
pub use vowel::{ClassificationResult, Vowel, VowelClassifier, VowelTrainer};
