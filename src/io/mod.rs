//! Sample input modules
//!
//! Validated mono waveforms and the frame slicing shared by every analysis:
//! - Waveform container
//! - Stateless framer over an in-memory waveform
//! - Streaming sample buffer for live sources

pub mod framer;
pub mod sample_buffer;
pub mod waveform;

pub use framer::{Frame, Framer, Frames};
pub use sample_buffer::{OwnedFrame, SampleBuffer};
pub use waveform::Waveform;
