//! Dither generators for requantization.
//!
//! Dither decorrelates quantization error from the signal by adding a
//! small noise value before rounding. Three flavours are provided: none,
//! triangular PDF, and high-passed (shaped) triangular PDF. Output is
//! offered in two domains: a 16-bit-scaled integer for the integer
//! narrowing paths and a ±1 float for the float-to-integer path.

use crate::rand::Lcg;

/// Scale from the 32-bit integer noise domain to ±1.0.
const FLOAT32_SCALER: f32 = 1.0 / 2_147_483_648.0;

/// A source of dither noise.
pub trait DitherGenerator {
    /// Amplitude of [`Self::generate_i16`] in bits (0 disables dither).
    const INT16_BITS: u32;
    /// Amplitude bound of [`Self::generate_f32`].
    const MAX_FLOAT32: f32;

    /// Noise scaled for 16-bit integer quantization, bounded by
    /// ±2^`INT16_BITS`.
    fn generate_i16(&mut self) -> i32;

    /// Noise in the float domain, bounded by ±`MAX_FLOAT32`.
    fn generate_f32(&mut self) -> f32;
}

/// No dither: both outputs are always zero.
#[derive(Debug, Default)]
pub struct NullDither;

impl DitherGenerator for NullDither {
    const INT16_BITS: u32 = 0;
    const MAX_FLOAT32: f32 = 0.0;

    #[inline]
    fn generate_i16(&mut self) -> i32 {
        0
    }

    #[inline]
    fn generate_f32(&mut self) -> f32 {
        0.0
    }
}

/// Triangular-PDF dither: the sum of two independent uniform draws.
#[derive(Debug)]
pub struct TriangularDither {
    rng: Lcg,
}

impl TriangularDither {
    const DEFAULT_SEED: u32 = 0x1942_da21;
    const INT16_SHIFT: u32 = 32 - <Self as DitherGenerator>::INT16_BITS;
    const FLOAT32_SHIFT: u32 = 1;

    /// Create a generator with the default seed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rng: Lcg::new(Self::DEFAULT_SEED),
        }
    }
}

impl Default for TriangularDither {
    fn default() -> Self {
        Self::new()
    }
}

impl DitherGenerator for TriangularDither {
    const INT16_BITS: u32 = 15;
    const MAX_FLOAT32: f32 = 1.0;

    #[inline]
    fn generate_i16(&mut self) -> i32 {
        ((self.rng.next_u32() as i32) >> Self::INT16_SHIFT)
            + ((self.rng.next_u32() as i32) >> Self::INT16_SHIFT)
    }

    #[inline]
    fn generate_f32(&mut self) -> f32 {
        let current = ((self.rng.next_u32() as i32) >> Self::FLOAT32_SHIFT)
            + ((self.rng.next_u32() as i32) >> Self::FLOAT32_SHIFT);
        current as f32 * FLOAT32_SCALER
    }
}

/// High-passed triangular dither: a first difference of TPDF noise,
/// pushing the noise energy toward the top of the band.
#[derive(Debug)]
pub struct ShapedDither {
    rng: Lcg,
    previous: i32,
}

impl ShapedDither {
    const DEFAULT_SEED: u32 = 0xac9a_d704;
    const INITIAL_SHIFT: u32 = 2;
    const INT16_SHIFT: u32 =
        32 - <Self as DitherGenerator>::INT16_BITS - (Self::INITIAL_SHIFT - 1);

    /// Create a generator with the default seed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rng: Lcg::new(Self::DEFAULT_SEED),
            previous: 0,
        }
    }

    #[inline]
    fn generate_high_pass(&mut self) -> i32 {
        let current = ((self.rng.next_u32() as i32) >> Self::INITIAL_SHIFT)
            + ((self.rng.next_u32() as i32) >> Self::INITIAL_SHIFT);
        let high_pass = current.wrapping_sub(self.previous);
        self.previous = current;
        high_pass
    }
}

impl Default for ShapedDither {
    fn default() -> Self {
        Self::new()
    }
}

impl DitherGenerator for ShapedDither {
    const INT16_BITS: u32 = 15;
    const MAX_FLOAT32: f32 = 1.0;

    #[inline]
    fn generate_i16(&mut self) -> i32 {
        self.generate_high_pass() >> Self::INT16_SHIFT
    }

    #[inline]
    fn generate_f32(&mut self) -> f32 {
        self.generate_high_pass() as f32 * FLOAT32_SCALER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAWS: usize = 100_000;

    fn check_i16_bounds<D: DitherGenerator>(source: &mut D) {
        let limit = 1_i32 << D::INT16_BITS;
        let mut max = 0;
        let mut min = 0;
        for _ in 0..DRAWS {
            let dither = source.generate_i16();
            assert!(dither <= limit, "dither {dither} above {limit}");
            assert!(dither >= -limit, "dither {dither} below {}", -limit);
            max = max.max(dither);
            min = min.min(dither);
        }
        if D::INT16_BITS > 0 {
            // The generator should actually use most of its range.
            assert!(max > limit / 2);
            assert!(min < -limit / 2);
        }
    }

    fn check_f32_bounds<D: DitherGenerator>(source: &mut D) {
        for _ in 0..DRAWS {
            let dither = source.generate_f32();
            assert!(dither.abs() <= D::MAX_FLOAT32 + f32::EPSILON);
        }
    }

    #[test]
    fn null_dither_is_silent() {
        let mut source = NullDither;
        for _ in 0..16 {
            assert_eq!(source.generate_i16(), 0);
            assert_eq!(source.generate_f32(), 0.0);
        }
    }

    #[test]
    fn triangular_bounds() {
        check_i16_bounds(&mut TriangularDither::new());
        check_f32_bounds(&mut TriangularDither::new());
    }

    #[test]
    fn shaped_bounds() {
        check_i16_bounds(&mut ShapedDither::new());
        check_f32_bounds(&mut ShapedDither::new());
    }

    #[test]
    fn triangular_known_sequence() {
        let mut source = TriangularDither::new();
        assert_eq!(source.generate_i16(), -2368);
        assert_eq!(source.generate_i16(), -11493);
        assert_eq!(source.generate_i16(), 2818);
    }

    #[test]
    fn shaped_known_sequence() {
        let mut source = ShapedDither::new();
        assert_eq!(source.generate_i16(), 4347);
        assert_eq!(source.generate_i16(), -4490);
        assert_eq!(source.generate_i16(), -9020);
    }

    #[test]
    fn float_sequences_are_deterministic() {
        let mut source = TriangularDither::new();
        assert!((source.generate_f32() - -0.072_253_17).abs() < 1e-6);
        assert!((source.generate_f32() - -0.350_694_44).abs() < 1e-6);

        let mut source = ShapedDither::new();
        assert!((source.generate_f32() - 0.132_667_74).abs() < 1e-6);
        assert!((source.generate_f32() - -0.137_003_82).abs() < 1e-6);
    }

    #[test]
    fn triangular_mean_is_near_zero() {
        let mut source = TriangularDither::new();
        let mut sum = 0.0_f64;
        for _ in 0..DRAWS {
            sum += f64::from(source.generate_f32());
        }
        assert!((sum / DRAWS as f64).abs() < 0.01);
    }
}
