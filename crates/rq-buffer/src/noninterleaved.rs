//! Channel-major (non-interleaved) sample storage.

use rq_core::SampleValue;

use crate::error::BufferError;
use crate::views::{Strided, StridedMut};

/// An owned non-interleaved buffer: all frames of channel 0, then all
/// frames of channel 1, and so on.
///
/// A channel is contiguous; a frame is a strided view.
#[derive(Clone, Debug, PartialEq)]
pub struct Noninterleaved<S> {
    data: Vec<S>,
    channels: usize,
    frames: usize,
}

impl<S: SampleValue> Noninterleaved<S> {
    /// A zero-filled buffer of `channels` × `frames`.
    #[must_use]
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            data: vec![S::default(); channels * frames],
            channels,
            frames,
        }
    }

    /// Wrap existing channel-major data.
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

    /// The flat channel-major data.
    #[must_use]
    pub fn as_slice(&self) -> &[S] {
        &self.data
    }

    /// The flat channel-major data, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [S] {
        &mut self.data
    }

    /// Channel `n` as a contiguous slice of `frames` samples.
    ///
    /// # Panics
    /// Panics when `n >= channels`.
    #[must_use]
    pub fn channel(&self, n: usize) -> &[S] {
        assert!(n < self.channels, "channel {n} out of range ({})", self.channels);
        &self.data[n * self.frames..(n + 1) * self.frames]
    }

    /// Channel `n`, mutably.
    ///
    /// # Panics
    /// Panics when `n >= channels`.
    pub fn channel_mut(&mut self, n: usize) -> &mut [S] {
        assert!(n < self.channels, "channel {n} out of range ({})", self.channels);
        &mut self.data[n * self.frames..(n + 1) * self.frames]
    }

    /// Frame `n` as a strided view of `channels` samples.
    ///
    /// # Panics
    /// Panics when `n >= frames`.
    #[must_use]
    pub fn frame(&self, n: usize) -> Strided<'_, S> {
        assert!(n < self.frames, "frame {n} out of range ({})", self.frames);
        // With zero channels the data is empty; clamp so the view is too.
        let start = n.min(self.data.len());
        Strided::new(&self.data[start..], self.frames)
    }

    /// Frame `n`, mutably.
    ///
    /// # Panics
    /// Panics when `n >= frames`.
    pub fn frame_mut(&mut self, n: usize) -> StridedMut<'_, S> {
        assert!(n < self.frames, "frame {n} out of range ({})", self.frames);
        let start = n.min(self.data.len());
        StridedMut::new(&mut self.data[start..], self.frames)
    }

    /// The sample at (`channel`, `frame`).
    ///
    /// # Panics
    /// Panics when either index is out of range.
    #[must_use]
    pub fn sample(&self, channel: usize, frame: usize) -> S {
        assert!(channel < self.channels && frame < self.frames);
        self.data[channel * self.frames + frame]
    }

    /// Overwrite the sample at (`channel`, `frame`).
    ///
    /// # Panics
    /// Panics when either index is out of range.
    pub fn set_sample(&mut self, channel: usize, frame: usize, value: S) {
        assert!(channel < self.channels && frame < self.frames);
        self.data[channel * self.frames + frame] = value;
    }

    /// Iterate over channels as contiguous slices.
    pub fn iter_channels(&self) -> impl Iterator<Item = &[S]> {
        self.data.chunks_exact(self.frames.max(1))
    }

    /// Iterate mutably over channels.
    pub fn iter_channels_mut(&mut self) -> impl Iterator<Item = &mut [S]> {
        self.data.chunks_exact_mut(self.frames.max(1))
    }
}
