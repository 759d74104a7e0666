//! Sample format conversion.
//!
//! Every ordered pair of sample formats has a conversion. Widening
//! integer conversions shift left and are exact. Narrowing integer
//! conversions clip the top of the range, round halves away from zero,
//! and mix in dither at the output quantization step. Float-to-integer
//! conversions clip to the integer range, scale with headroom reserved
//! for the dither amplitude, and round half to even.

use crate::dither::DitherGenerator;
use crate::int24::Int24;
use crate::sample::SampleValue;

/// Conversion into `Self` from another sample format.
pub trait FromSample<S: SampleValue>: SampleValue {
    /// Convert `sample`, drawing from `dither` where the target
    /// quantization calls for it.
    fn from_sample<D: DitherGenerator>(sample: S, dither: &mut D) -> Self;
}

/// Convert a sample between formats.
///
/// # Example
/// ```
/// use rq_core::{NullDither, convert};
/// let wide: i32 = convert(0x1234_i16, &mut NullDither);
/// assert_eq!(wide, 0x1234_0000);
/// ```
#[inline]
pub fn convert<O, S, D>(sample: S, dither: &mut D) -> O
where
    S: SampleValue,
    O: FromSample<S>,
    D: DitherGenerator,
{
    O::from_sample(sample, dither)
}

/// Round a float to the nearest integer, ties to even (`lrint` semantics).
#[inline]
fn round_f32_to_i32(value: f32) -> i32 {
    value.round_ties_even() as i32
}

// The `sample >> 31` term is 0 for non-negative inputs and -1 for negative
// inputs; added to the rounding constant it turns round-half-up into
// round-half-away-from-zero.

#[inline]
fn narrow_i24_to_i16<D: DitherGenerator>(sample: i32, dither: &mut D) -> i16 {
    const SAMPLE_IN_MAX: i32 = 0x007F_FF80;
    const ROUNDING: i32 = 0x80;
    const TOTAL_SHIFT: u32 = 8;
    let pre_dither_shift = if D::INT16_BITS > 0 {
        D::INT16_BITS - TOTAL_SHIFT
    } else {
        0
    };
    let post_dither_shift = TOTAL_SHIFT + pre_dither_shift;

    if sample >= SAMPLE_IN_MAX {
        return i16::MAX;
    }
    ((((sample + (ROUNDING + (sample >> 31))) << pre_dither_shift) + dither.generate_i16())
        >> post_dither_shift) as i16
}

#[inline]
fn narrow_i32_to_i16<D: DitherGenerator>(sample: i32, dither: &mut D) -> i16 {
    const SAMPLE_IN_MAX: i32 = 0x7FFF_8000;
    const ROUNDING: i32 = 0x8000;
    const TOTAL_SHIFT: u32 = 16;
    let pre_dither_shift = TOTAL_SHIFT - D::INT16_BITS;
    let post_dither_shift = TOTAL_SHIFT - pre_dither_shift;

    if sample >= SAMPLE_IN_MAX {
        return i16::MAX;
    }
    ((((sample + (ROUNDING + (sample >> 31))) >> pre_dither_shift) + dither.generate_i16())
        >> post_dither_shift) as i16
}

#[inline]
fn narrow_i32_to_i24(sample: i32) -> Int24 {
    const SAMPLE_IN_MAX: i32 = 0x7FFF_FF80;
    const ROUNDING: i32 = 0x80;

    if sample >= SAMPLE_IN_MAX {
        return Int24::MAX;
    }
    Int24::from_i32((sample + (ROUNDING + (sample >> 31))) >> 8)
}

/// Clip, scale with dither headroom, dither, and round into the integer
/// domain of `O`. Returns the integer value in an `i32`.
#[inline]
fn float_to_int_domain<O, D>(sample: f32, out_min: i32, out_max: i32, dither: &mut D) -> i32
where
    O: SampleValue,
    D: DitherGenerator,
{
    let sample_in_max = out_max as f32 * O::FLOAT_DIVISOR;
    let sample_in_min = out_min as f32 * O::FLOAT_DIVISOR;
    if sample >= sample_in_max {
        return out_max;
    }
    if sample < sample_in_min {
        return out_min;
    }
    let scaler = O::FLOAT_MULTIPLIER - D::MAX_FLOAT32;
    round_f32_to_i32(sample * scaler + dither.generate_f32())
}

// === identities ===

impl FromSample<i16> for i16 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: i16, _dither: &mut D) -> Self {
        sample
    }
}

impl FromSample<Int24> for Int24 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: Int24, _dither: &mut D) -> Self {
        sample
    }
}

impl FromSample<i32> for i32 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: i32, _dither: &mut D) -> Self {
        sample
    }
}

impl FromSample<f32> for f32 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: f32, _dither: &mut D) -> Self {
        sample
    }
}

// === integer widening ===

impl FromSample<i16> for Int24 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: i16, _dither: &mut D) -> Self {
        Int24::from_i32(i32::from(sample) << 8)
    }
}

impl FromSample<i16> for i32 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: i16, _dither: &mut D) -> Self {
        i32::from(sample) << 16
    }
}

impl FromSample<Int24> for i32 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: Int24, _dither: &mut D) -> Self {
        sample.to_i32() << 8
    }
}

// === integer narrowing ===

impl FromSample<Int24> for i16 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: Int24, dither: &mut D) -> Self {
        narrow_i24_to_i16(sample.to_i32(), dither)
    }
}

impl FromSample<i32> for i16 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: i32, dither: &mut D) -> Self {
        narrow_i32_to_i16(sample, dither)
    }
}

impl FromSample<i32> for Int24 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: i32, _dither: &mut D) -> Self {
        narrow_i32_to_i24(sample)
    }
}

// === integer to float ===

impl FromSample<i16> for f32 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: i16, _dither: &mut D) -> Self {
        f32::from(sample) * i16::FLOAT_DIVISOR
    }
}

impl FromSample<Int24> for f32 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: Int24, _dither: &mut D) -> Self {
        sample.to_i32() as f32 * Int24::FLOAT_DIVISOR
    }
}

impl FromSample<i32> for f32 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: i32, _dither: &mut D) -> Self {
        sample as f32 * i32::FLOAT_DIVISOR
    }
}

// === float to integer ===

impl FromSample<f32> for i16 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: f32, dither: &mut D) -> Self {
        float_to_int_domain::<i16, D>(sample, i32::from(i16::MIN), i32::from(i16::MAX), dither)
            as i16
    }
}

impl FromSample<f32> for Int24 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: f32, dither: &mut D) -> Self {
        Int24::from_i32(float_to_int_domain::<Int24, D>(
            sample,
            Int24::MIN.to_i32(),
            Int24::MAX.to_i32(),
            dither,
        ))
    }
}

impl FromSample<f32> for i32 {
    #[inline]
    fn from_sample<D: DitherGenerator>(sample: f32, dither: &mut D) -> Self {
        float_to_int_domain::<i32, D>(sample, i32::MIN, i32::MAX, dither)
    }
}
