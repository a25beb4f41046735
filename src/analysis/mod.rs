//! Analysis and result aggregation
//!
//! - Per-frame feature extraction
//! - Result types and time-stamped tracks
//! - Metadata

pub mod frame;
pub mod metadata;
pub mod result;

pub use frame::FrameAnalyzer;
