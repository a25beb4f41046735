//! Chroma extraction
//!
//! Fold a magnitude spectrum onto the 12 pitch classes (C, C#, ..., B) over a
//! five-octave band around middle C.

pub mod extractor;

pub use extractor::{ChromaAggregator, ChromaVector, CHROMA_DISPLAY_SENTINEL};
