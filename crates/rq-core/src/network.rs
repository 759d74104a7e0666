//! Big-endian wire-order samples.
//!
//! A [`NetworkSample`] holds a sample value in network byte order, the
//! layout audio-over-IP payloads use. Format conversion always happens
//! in the native value domain; the wire wrapper only reorders bytes.

use crate::convert::FromSample;
use crate::dither::DitherGenerator;
use crate::sample::SampleValue;

/// A sample stored in big-endian byte order.
///
/// # Example
/// ```
/// use rq_core::NetworkSample;
/// let wire = NetworkSample::from_native(0x1234_i16);
/// assert_eq!(wire.as_bytes(), &[0x12, 0x34]);
/// assert_eq!(wire.to_native(), 0x1234);
/// ```
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct NetworkSample<S: SampleValue> {
    bytes: S::Bytes,
}

impl<S: SampleValue> NetworkSample<S> {
    /// Wrap a native sample into wire order.
    #[must_use]
    pub fn from_native(sample: S) -> Self {
        Self {
            bytes: sample.to_be_bytes(),
        }
    }

    /// Reconstruct the native sample.
    #[must_use]
    pub fn to_native(self) -> S {
        S::from_be_bytes(self.bytes)
    }

    /// Construct directly from wire bytes.
    #[must_use]
    pub fn from_bytes(bytes: S::Bytes) -> Self {
        Self { bytes }
    }

    /// The wire bytes, most significant first.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }
}

/// Convert a native sample into a wire sample of another format.
#[inline]
pub fn convert_to_network<O, S, D>(sample: S, dither: &mut D) -> NetworkSample<O>
where
    S: SampleValue,
    O: FromSample<S>,
    D: DitherGenerator,
{
    NetworkSample::from_native(O::from_sample(sample, dither))
}

/// Convert a wire sample into a native sample of another format.
#[inline]
pub fn convert_from_network<O, S, D>(sample: NetworkSample<S>, dither: &mut D) -> O
where
    S: SampleValue,
    O: FromSample<S>,
    D: DitherGenerator,
{
    O::from_sample(sample.to_native(), dither)
}
