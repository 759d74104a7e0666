use thiserror::Error;

/// Errors originating from the buffer crate.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// The flat data length does not match the requested shape.
    #[error("buffer length {len} does not match {channels} channels x {frames} frames")]
    ShapeMismatch {
        /// Flat sample count supplied.
        len: usize,
        /// Requested channel count.
        channels: usize,
        /// Requested frame count.
        frames: usize,
    },

    /// Source and destination disagree on the frame count.
    #[error("frame counts differ: source {src} vs destination {dst}")]
    FrameCountMismatch {
        /// Source frame count.
        src: usize,
        /// Destination frame count.
        dst: usize,
    },
}
