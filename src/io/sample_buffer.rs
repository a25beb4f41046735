//! Streaming frame buffer for live sources
//!
//! A live source delivers samples in arbitrary chunks; the buffer hands back
//! complete frames in arrival order, advancing by the shift size each time.

use crate::error::AnalysisError;

/// Frame copied out of a [`SampleBuffer`]
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedFrame {
    /// Absolute offset of the first sample since the buffer was created
    pub position: usize,
    /// Frame samples
    pub samples: Vec<f32>,
}

/// Buffer for windowed audio processing
#[derive(Debug)]
pub struct SampleBuffer {
    /// Buffered samples not yet consumed
    data: Vec<f32>,
    /// Absolute position of `data[0]`
    offset: usize,
    /// Incoming samples still to drop before `data[0]` when the shift outran the buffer
    skip: usize,
    frame_size: usize,
    shift_size: usize,
}

impl SampleBuffer {
    /// Create a new sample buffer
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if either size is zero.
    pub fn new(frame_size: usize, shift_size: usize) -> Result<Self, AnalysisError> {
        if frame_size == 0 || shift_size == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Frame and shift sizes must be > 0, got {} / {}",
                frame_size, shift_size
            )));
        }

        Ok(Self {
            data: Vec::with_capacity(frame_size * 2),
            offset: 0,
            skip: 0,
            frame_size,
            shift_size,
        })
    }

    /// Add samples to buffer
    pub fn push(&mut self, samples: &[f32]) {
        let dropped = self.skip.min(samples.len());
        self.skip -= dropped;
        self.data.extend_from_slice(&samples[dropped..]);
    }

    /// Number of buffered samples
    pub fn buffered(&self) -> usize {
        self.data.len()
    }

    /// Get next complete frame, or `None` until enough samples arrive
    pub fn next_frame(&mut self) -> Option<OwnedFrame> {
        if self.data.len() < self.frame_size {
            return None;
        }

        let frame = OwnedFrame {
            position: self.offset,
            samples: self.data[..self.frame_size].to_vec(),
        };

        // a shift longer than the frame can reach past the buffered samples
        let consumed = self.shift_size.min(self.data.len());
        self.data.drain(..consumed);
        self.skip = self.shift_size - consumed;
        self.offset += self.shift_size;

        Some(frame)
    }
}
