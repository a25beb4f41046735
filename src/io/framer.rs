//! Frame slicing
//!
//! Splits a waveform into overlapping fixed-length frames. Frame `i` starts at
//! sample `i * shift_size` and holds exactly `frame_size` samples; samples that
//! do not fill a whole frame at the tail are dropped.
//!
//! # Example
//!
//! ```
//! use tonal_dsp::io::Framer;
//!
//! let samples: Vec<f32> = (0..10).map(|i| i as f32).collect();
//! let framer = Framer::new(4, 2)?;
//! let frames: Vec<_> = framer.frames(&samples).collect();
//!
//! // floor((10 - 4) / 2) = 3 frames
//! assert_eq!(frames.len(), 3);
//! assert_eq!(frames[1].samples, &[2.0, 3.0, 4.0, 5.0]);
//! # Ok::<(), tonal_dsp::AnalysisError>(())
//! ```

use crate::error::AnalysisError;

/// One frame borrowed from a waveform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<'a> {
    /// Frame index
    pub index: usize,
    /// Offset of the first sample in the waveform
    pub position: usize,
    /// Frame samples (`frame_size` long)
    pub samples: &'a [f32],
}

/// Stateless frame slicer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framer {
    frame_size: usize,
    shift_size: usize,
}

impl Framer {
    /// Create a framer
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if either size is zero.
    pub fn new(frame_size: usize, shift_size: usize) -> Result<Self, AnalysisError> {
        if frame_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Frame size must be > 0".to_string(),
            ));
        }

        if shift_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Shift size must be > 0".to_string(),
            ));
        }

        Ok(Self {
            frame_size,
            shift_size,
        })
    }

    /// Frame length in samples
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Shift length in samples
    pub fn shift_size(&self) -> usize {
        self.shift_size
    }

    /// Number of frames for a waveform of `len` samples: `floor((len - frame_size) / shift_size)`
    pub fn frame_count(&self, len: usize) -> usize {
        if len < self.frame_size {
            0
        } else {
            (len - self.frame_size) / self.shift_size
        }
    }

    /// Random access to frame `index`, `None` past the last frame
    pub fn frame<'a>(&self, samples: &'a [f32], index: usize) -> Option<Frame<'a>> {
        if index >= self.frame_count(samples.len()) {
            return None;
        }
        let position = index * self.shift_size;
        Some(Frame {
            index,
            position,
            samples: &samples[position..position + self.frame_size],
        })
    }

    /// Lazy sequence of all frames
    pub fn frames<'a>(&self, samples: &'a [f32]) -> Frames<'a> {
        Frames {
            framer: *self,
            samples,
            next: 0,
            count: self.frame_count(samples.len()),
        }
    }

    /// Start time of frame `index` in seconds
    pub fn frame_time(&self, index: usize, sample_rate: u32) -> f32 {
        (index * self.shift_size) as f32 / sample_rate as f32
    }
}

/// Iterator over the frames of a waveform
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    framer: Framer,
    samples: &'a [f32],
    next: usize,
    count: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let frame = self.framer.frame(self.samples, self.next);
        self.next += 1;
        frame
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}
