//! Frame-major (interleaved) sample storage.

use rq_core::SampleValue;

use crate::error::BufferError;
use crate::views::{Strided, StridedMut};

/// An owned interleaved buffer: all channels of frame 0, then all
/// channels of frame 1, and so on.
///
/// A frame is contiguous; a channel is a strided view.
///
/// # Example
/// ```
/// use rq_buffer::Interleaved;
/// let buf = Interleaved::<i16>::new(2, 512);
/// assert_eq!(buf.channels(), 2);
/// assert_eq!(buf.frames(), 512);
/// assert_eq!(buf.samples(), 1024);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Interleaved<S> {
    data: Vec<S>,
    channels: usize,
    frames: usize,
}

impl<S: SampleValue> Interleaved<S> {
    /// A zero-filled buffer of `channels` × `frames`.
    #[must_use]
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            data: vec![S::default(); channels * frames],
            channels,
            frames,
        }
    }

    /// Wrap existing frame-major data.
    ///
    /// # Errors
    /// Fails when `data.len() != channels * frames`.
    pub fn from_vec(data: Vec<S>, channels: usize, frames: usize) -> Result<Self, BufferError> {
        if data.len() != channels * frames {
            return Err(BufferError::ShapeMismatch {
                len: data.len(),
                channels,
                frames,
            });
        }
        Ok(Self {
            data,
            channels,
            frames,
        })
    }

    /// Number of channels.
    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of frames.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Total sample count (`channels * frames`).
    #[must_use]
    pub fn samples(&self) -> usize {
        self.channels * self.frames
    }

    /// Whether the buffer holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels == 0 || self.frames == 0
    }

    /// The flat frame-major data.
    #[must_use]
    pub fn as_slice(&self) -> &[S] {
        &self.data
    }

    /// The flat frame-major data, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [S] {
        &mut self.data
    }

    /// Frame `n` as a contiguous slice of `channels` samples.
    ///
    /// # Panics
    /// Panics when `n >= frames`.
    #[must_use]
    pub fn frame(&self, n: usize) -> &[S] {
        assert!(n < self.frames, "frame {n} out of range ({})", self.frames);
        &self.data[n * self.channels..(n + 1) * self.channels]
    }

    /// Frame `n`, mutably.
    ///
    /// # Panics
    /// Panics when `n >= frames`.
    pub fn frame_mut(&mut self, n: usize) -> &mut [S] {
        assert!(n < self.frames, "frame {n} out of range ({})", self.frames);
        &mut self.data[n * self.channels..(n + 1) * self.channels]
    }

    /// Channel `n` as a strided view of `frames` samples.
    ///
    /// # Panics
    /// Panics when `n >= channels`.
    #[must_use]
    pub fn channel(&self, n: usize) -> Strided<'_, S> {
        assert!(n < self.channels, "channel {n} out of range ({})", self.channels);
        // With zero frames the data is empty; clamp so the view is too.
        let start = n.min(self.data.len());
        Strided::new(&self.data[start..], self.channels)
    }

    /// Channel `n`, mutably.
    ///
    /// # Panics
    /// Panics when `n >= channels`.
    pub fn channel_mut(&mut self, n: usize) -> StridedMut<'_, S> {
        assert!(n < self.channels, "channel {n} out of range ({})", self.channels);
        let start = n.min(self.data.len());
        StridedMut::new(&mut self.data[start..], self.channels)
    }

    /// The sample at (`channel`, `frame`).
    ///
    /// # Panics
    /// Panics when either index is out of range.
    #[must_use]
    pub fn sample(&self, channel: usize, frame: usize) -> S {
        assert!(channel < self.channels && frame < self.frames);
        self.data[frame * self.channels + channel]
    }

    /// Overwrite the sample at (`channel`, `frame`).
    ///
    /// # Panics
    /// Panics when either index is out of range.
    pub fn set_sample(&mut self, channel: usize, frame: usize, value: S) {
        assert!(channel < self.channels && frame < self.frames);
        self.data[frame * self.channels + channel] = value;
    }

    /// Iterate over frames as contiguous slices.
    pub fn iter_frames(&self) -> impl Iterator<Item = &[S]> {
        self.data.chunks_exact(self.channels.max(1))
    }

    /// Iterate mutably over frames.
    pub fn iter_frames_mut(&mut self) -> impl Iterator<Item = &mut [S]> {
        self.data.chunks_exact_mut(self.channels.max(1))
    }
}
