//! The requantization pipelines the demo compares.
//!
//! Every pipeline starts from the same tone and quantizes it a
//! different way, so the views can put the results side by side: the
//! float reference, a plain 32-bit rounding, a dithered 16-bit
//! rounding, a noise-shaped 16-bit rounding, and a full
//! float→int32→int16→float walk through the buffer transforms.
//! All outputs come back in the ±1 float domain.

use rq_buffer::{Interleaved, transform_interleaved};
use rq_core::dither::DitherGenerator;
use rq_core::{AnalysisConfig, TriangularDither};

use crate::osc::{ToneGenerator, Waveform};

/// Weight of the fed-back quantization error in the noise-shaped
/// pipeline.
const NOISE_SHAPING_WEIGHT: f64 = 0.8;

/// One tone and the quantization experiments defined over it.
#[derive(Debug, Clone, Copy)]
pub struct TonePlan {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Signal length in samples.
    pub num_samples: usize,
    /// Tone frequency in Hz.
    pub frequency: f64,
    /// Tone amplitude, full scale = 1.0.
    pub amplitude: f64,
    /// Waveform shape.
    pub waveform: Waveform,
}

impl TonePlan {
    /// Build a plan from the shared analysis config (sine waveform).
    #[must_use]
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            num_samples: config.num_samples,
            frequency: config.frequency,
            amplitude: config.amplitude,
            waveform: Waveform::Sine,
        }
    }

    fn generator(&self) -> ToneGenerator {
        ToneGenerator {
            waveform: self.waveform,
            frequency: self.frequency,
            sample_rate: self.sample_rate,
            amplitude: self.amplitude,
        }
    }

    /// Per-sample timestamps in seconds.
    #[must_use]
    pub fn time_axis(&self) -> Vec<f64> {
        let rate = f64::from(self.sample_rate);
        (0..self.num_samples).map(|n| n as f64 / rate).collect()
    }

    /// The float64 reference tone.
    #[must_use]
    pub fn reference(&self) -> Vec<f64> {
        self.generator().generate(self.num_samples)
    }

    /// The tone quantized to 32 bits without dither, scaled back to ±1.
    #[must_use]
    pub fn quantized_i32(&self) -> Vec<f64> {
        let scaler = f64::from(1_u32 << 31);
        let tone = self.generator();
        (0..self.num_samples)
            .map(|n| {
                let quantized = (tone.value(n) * scaler).round() as i32;
                f64::from(quantized) / scaler
            })
            .collect()
    }

    /// The tone quantized to 16 bits with triangular dither, scaled back
    /// to ±1. The scaler reserves headroom for the dither amplitude.
    #[must_use]
    pub fn dithered_i16(&self) -> Vec<f64> {
        let mut dither = TriangularDither::new();
        let scaler = f64::from(1_u32 << 15) - f64::from(TriangularDither::MAX_FLOAT32);
        let tone = self.generator();
        (0..self.num_samples)
            .map(|n| {
                let scaled = tone.value(n) * scaler;
                let quantized = (scaled + f64::from(dither.generate_f32())).round() as i32;
                f64::from(quantized) / scaler
            })
            .collect()
    }

    /// The dithered 16-bit quantization with first-order error feedback:
    /// each sample absorbs a weighted share of the previous sample's
    /// quantization error, pushing the error spectrum out of band.
    #[must_use]
    pub fn noise_shaped_i16(&self) -> Vec<f64> {
        let mut dither = TriangularDither::new();
        let scaler = f64::from(1_u32 << 15) - f64::from(TriangularDither::MAX_FLOAT32);
        let tone = self.generator();
        let mut error = 0.0_f64;
        (0..self.num_samples)
            .map(|n| {
                let scaled = tone.value(n) * scaler;
                let quantized = (scaled
                    + f64::from(dither.generate_f32())
                    + NOISE_SHAPING_WEIGHT * error)
                    .round() as i32;
                error = scaled - f64::from(quantized);
                f64::from(quantized) / scaler
            })
            .collect()
    }

    /// The float tone pushed through the buffer transforms:
    /// f32 → i32 → i16 → f32, dithering at each narrowing step.
    #[must_use]
    pub fn requantized_f32(&self) -> Vec<f32> {
        let tone = self.generator();
        let input: Vec<f32> = (0..self.num_samples).map(|n| tone.value(n) as f32).collect();
        let Ok(input) = Interleaved::from_vec(input, 1, self.num_samples) else {
            return vec![0.0; self.num_samples];
        };

        let mut dither = TriangularDither::new();
        let mut deep = Interleaved::<i32>::new(1, self.num_samples);
        let mut shallow = Interleaved::<i16>::new(1, self.num_samples);
        let mut output = Interleaved::<f32>::new(1, self.num_samples);

        if transform_interleaved(&input, &mut deep, &mut dither).is_err()
            || transform_interleaved(&deep, &mut shallow, &mut dither).is_err()
            || transform_interleaved(&shallow, &mut output, &mut dither).is_err()
        {
            log::warn!("requantization transform failed, returning silence");
            return vec![0.0; self.num_samples];
        }
        output.as_slice().to_vec()
    }

    /// `count` raw triangular dither samples, for density views.
    #[must_use]
    pub fn triangular_noise(count: usize) -> Vec<f32> {
        let mut dither = TriangularDither::new();
        (0..count).map(|_| dither.generate_f32()).collect()
    }

    /// `count` raw shaped dither samples, for density views.
    #[must_use]
    pub fn shaped_noise(count: usize) -> Vec<f32> {
        let mut dither = rq_core::ShapedDither::new();
        (0..count).map(|_| dither.generate_f32()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> TonePlan {
        TonePlan {
            sample_rate: 44_100,
            num_samples: 4_096,
            frequency: 1_000.0,
            amplitude: 0.8,
            waveform: Waveform::Sine,
        }
    }

    #[test]
    fn time_axis_is_uniform() {
        let axis = plan().time_axis();
        assert_eq!(axis.len(), 4_096);
        assert_eq!(axis[0], 0.0);
        let step = axis[1] - axis[0];
        assert!((step - 1.0 / 44_100.0).abs() < 1e-15);
        assert!((axis[100] - 100.0 * step).abs() < 1e-12);
    }

    #[test]
    fn empty_plan_produces_empty_vectors() {
        let empty = TonePlan {
            num_samples: 0,
            ..plan()
        };
        assert!(empty.time_axis().is_empty());
        assert!(empty.reference().is_empty());
        assert!(empty.quantized_i32().is_empty());
        assert!(empty.dithered_i16().is_empty());
        assert!(empty.requantized_f32().is_empty());
    }

    #[test]
    fn quantized_i32_is_nearly_exact() {
        let plan = plan();
        for (reference, quantized) in plan.reference().iter().zip(plan.quantized_i32()) {
            // 32-bit quantization error is far below any audible floor.
            assert!((reference - quantized).abs() < 1e-8);
        }
    }

    #[test]
    fn dithered_i16_stays_within_two_steps() {
        let plan = plan();
        let step = 1.0 / 32_767.0;
        for (reference, dithered) in plan.reference().iter().zip(plan.dithered_i16()) {
            assert!(
                (reference - dithered).abs() < 2.0 * step,
                "{reference} vs {dithered}"
            );
        }
    }

    #[test]
    fn noise_shaping_keeps_bounded_error() {
        let plan = plan();
        let step = 1.0 / 32_767.0;
        for (reference, shaped) in plan.reference().iter().zip(plan.noise_shaped_i16()) {
            // The error feedback loop is bounded by (dither + rounding)
            // over (1 - weight): 1.5 / 0.2 = 7.5 steps.
            assert!(
                (reference - shaped).abs() < 8.0 * step,
                "{reference} vs {shaped}"
            );
        }
    }

    #[test]
    fn requantized_walk_matches_reference_within_16_bits() {
        let plan = plan();
        let requantized = plan.requantized_f32();
        assert_eq!(requantized.len(), plan.num_samples);
        for (reference, value) in plan.reference().iter().zip(requantized) {
            assert!(
                (*reference as f32 - value).abs() < 2.5 / 32_768.0,
                "{reference} vs {value}"
            );
        }
    }

    #[test]
    fn noise_sets_have_requested_length_and_bounds() {
        let noise = TonePlan::triangular_noise(10_000);
        assert_eq!(noise.len(), 10_000);
        for v in &noise {
            assert!(v.abs() <= 1.0);
        }
        let noise = TonePlan::shaped_noise(10_000);
        assert_eq!(noise.len(), 10_000);
        for v in &noise {
            assert!(v.abs() <= 1.0);
        }
    }
}
