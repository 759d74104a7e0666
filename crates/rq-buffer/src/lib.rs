/// Sample buffers for requant.
///
/// Owned interleaved (frame-major) and non-interleaved (channel-major)
/// buffers over any [`rq_core::SampleValue`], with contiguous and strided
/// views, and whole-buffer transforms that convert sample format and
/// layout in one pass.

pub mod error;
pub mod interleaved;
pub mod noninterleaved;
pub mod transform;
pub mod views;

pub use error::BufferError;
pub use interleaved::Interleaved;
pub use noninterleaved::Noninterleaved;
pub use transform::{
    transform_interleaved, transform_interleaved_to_noninterleaved, transform_noninterleaved,
    transform_noninterleaved_to_interleaved,
};
pub use views::{Strided, StridedMut};
