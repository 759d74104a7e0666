//! Whole-buffer transforms: sample format and layout in one pass.
//!
//! Source and destination must agree on the frame count. When the
//! channel counts match and the layouts do too, samples are converted as
//! one flat run; otherwise only `min(src_channels, dst_channels)`
//! channels are converted per frame and the remaining destination
//! samples are left untouched.

use rq_core::convert::FromSample;
use rq_core::dither::DitherGenerator;
use rq_core::{SampleValue, convert};

use crate::error::BufferError;
use crate::interleaved::Interleaved;
use crate::noninterleaved::Noninterleaved;

fn check_frames(src_frames: usize, dst_frames: usize) -> Result<(), BufferError> {
    if src_frames == dst_frames {
        Ok(())
    } else {
        Err(BufferError::FrameCountMismatch {
            src: src_frames,
            dst: dst_frames,
        })
    }
}

/// Convert an interleaved buffer into another interleaved buffer.
///
/// # Errors
/// Fails when the frame counts differ.
pub fn transform_interleaved<I, O, D>(
    src: &Interleaved<I>,
    dst: &mut Interleaved<O>,
    dither: &mut D,
) -> Result<(), BufferError>
where
    I: SampleValue,
    O: FromSample<I>,
    D: DitherGenerator,
{
    check_frames(src.frames(), dst.frames())?;

    if src.channels() == dst.channels() {
        // Same shape: one flat run over the samples.
        for (out, sample) in dst.as_mut_slice().iter_mut().zip(src.as_slice()) {
            *out = convert(*sample, dither);
        }
        return Ok(());
    }

    let channels = src.channels().min(dst.channels());
    for (dst_frame, src_frame) in dst.iter_frames_mut().zip(src.iter_frames()) {
        for channel in 0..channels {
            dst_frame[channel] = convert(src_frame[channel], dither);
        }
    }
    Ok(())
}

/// Convert a non-interleaved buffer into another non-interleaved buffer.
///
/// # Errors
/// Fails when the frame counts differ.
pub fn transform_noninterleaved<I, O, D>(
    src: &Noninterleaved<I>,
    dst: &mut Noninterleaved<O>,
    dither: &mut D,
) -> Result<(), BufferError>
where
    I: SampleValue,
    O: FromSample<I>,
    D: DitherGenerator,
{
    check_frames(src.frames(), dst.frames())?;

    if src.channels() == dst.channels() {
        for (out, sample) in dst.as_mut_slice().iter_mut().zip(src.as_slice()) {
            *out = convert(*sample, dither);
        }
        return Ok(());
    }

    let channels = src.channels().min(dst.channels());
    for channel in 0..channels {
        for (out, sample) in dst
            .channel_mut(channel)
            .iter_mut()
            .zip(src.channel(channel))
        {
            *out = convert(*sample, dither);
        }
    }
    Ok(())
}

/// Convert an interleaved buffer into a non-interleaved buffer.
///
/// # Errors
/// Fails when the frame counts differ.
pub fn transform_interleaved_to_noninterleaved<I, O, D>(
    src: &Interleaved<I>,
    dst: &mut Noninterleaved<O>,
    dither: &mut D,
) -> Result<(), BufferError>
where
    I: SampleValue,
    O: FromSample<I>,
    D: DitherGenerator,
{
    check_frames(src.frames(), dst.frames())?;

    let channels = src.channels().min(dst.channels());
    for channel in 0..channels {
        for (out, sample) in dst
            .channel_mut(channel)
            .iter_mut()
            .zip(src.channel(channel).iter())
        {
            *out = convert(*sample, dither);
        }
    }
    Ok(())
}

/// Convert a non-interleaved buffer into an interleaved buffer.
///
/// # Errors
/// Fails when the frame counts differ.
pub fn transform_noninterleaved_to_interleaved<I, O, D>(
    src: &Noninterleaved<I>,
    dst: &mut Interleaved<O>,
    dither: &mut D,
) -> Result<(), BufferError>
where
    I: SampleValue,
    O: FromSample<I>,
    D: DitherGenerator,
{
    check_frames(src.frames(), dst.frames())?;

    let channels = src.channels().min(dst.channels());
    for channel in 0..channels {
        let mut dst_channel = dst.channel_mut(channel);
        for (n, sample) in src.channel(channel).iter().enumerate() {
            if let Some(out) = dst_channel.get_mut(n) {
                *out = convert(*sample, dither);
            }
        }
    }
    Ok(())
}
