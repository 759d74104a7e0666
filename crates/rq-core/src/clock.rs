//! Sample-clock durations and time points.
//!
//! Durations on the sample clock are a sample count at a sample rate.
//! Combining two values requires equal rates: the operator forms panic on
//! a mismatch (it is a programming error to mix streams), the `checked_*`
//! forms return `None`, and comparisons between mismatched rates are
//! simply unordered. A zero-length duration compares equal to any other
//! zero-length duration regardless of rate.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::time::Duration;

/// A whole-sample span at a sample rate.
///
/// # Example
/// ```
/// use rq_core::time::SampleDuration;
/// let d = SampleDuration::new(48_000, 48_000);
/// assert_eq!(d.as_secs_f64(), 1.0);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SampleDuration {
    count: i64,
    rate: u32,
}

impl SampleDuration {
    /// A span of `count` samples at `rate` Hz.
    #[must_use]
    pub const fn new(count: i64, rate: u32) -> Self {
        Self { count, rate }
    }

    /// The whole-sample count.
    #[must_use]
    pub const fn sample_count(self) -> i64 {
        self.count
    }

    /// The sample rate in Hz.
    #[must_use]
    pub const fn sample_rate(self) -> u32 {
        self.rate
    }

    /// The span in seconds (0.0 when the rate is unset).
    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        if self.rate == 0 {
            return 0.0;
        }
        self.count as f64 / f64::from(self.rate)
    }

    /// Truncate a wall-clock duration onto the sample clock.
    #[must_use]
    pub fn from_duration(duration: Duration, rate: u32) -> Self {
        let whole = duration.as_secs() as i64 * i64::from(rate);
        let subsec =
            (u64::from(duration.subsec_nanos()) * u64::from(rate) / 1_000_000_000) as i64;
        Self::new(whole + subsec, rate)
    }

    /// The span as a wall-clock duration. Negative spans clamp to zero
    /// (`Duration` cannot represent them).
    #[must_use]
    pub fn to_duration(self) -> Duration {
        Duration::from_secs_f64(self.as_secs_f64().max(0.0))
    }

    /// Sum with an equal-rate span, or `None` on a rate mismatch.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        if self.rate == other.rate {
            Some(Self::new(self.count + other.count, self.rate))
        } else {
            None
        }
    }

    /// Difference with an equal-rate span, or `None` on a rate mismatch.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        if self.rate == other.rate {
            Some(Self::new(self.count - other.count, self.rate))
        } else {
            None
        }
    }
}

impl PartialEq for SampleDuration {
    fn eq(&self, other: &Self) -> bool {
        if self.count == 0 {
            return other.count == 0;
        }
        self.count == other.count && self.rate == other.rate
    }
}

impl PartialOrd for SampleDuration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.rate == other.rate || self.count == 0 || other.count == 0 {
            Some(self.count.cmp(&other.count))
        } else {
            None
        }
    }
}

impl Add for SampleDuration {
    type Output = SampleDuration;

    /// # Panics
    /// Panics when the sample rates differ.
    fn add(self, other: Self) -> Self {
        match self.checked_add(other) {
            Some(sum) => sum,
            None => panic!("sample rates differ: {} vs {}", self.rate, other.rate),
        }
    }
}

impl AddAssign for SampleDuration {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for SampleDuration {
    type Output = SampleDuration;

    /// # Panics
    /// Panics when the sample rates differ.
    fn sub(self, other: Self) -> Self {
        match self.checked_sub(other) {
            Some(diff) => diff,
            None => panic!("sample rates differ: {} vs {}", self.rate, other.rate),
        }
    }
}

impl SubAssign for SampleDuration {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

/// A fractional-sample span at a sample rate.
///
/// The whole part is kept as an integer count and the remainder as a
/// fraction, so long spans do not lose sample precision to the float.
/// The fraction carries the sign of the span until arithmetic
/// renormalizes it.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubsampleDuration {
    count: i64,
    fraction: f64,
    rate: u32,
}

impl SubsampleDuration {
    /// A span of `samples` (possibly fractional) at `rate` Hz.
    #[must_use]
    pub fn from_samples_f64(samples: f64, rate: u32) -> Self {
        let count = samples.trunc() as i64;
        Self {
            count,
            fraction: samples - count as f64,
            rate,
        }
    }

    /// Convert a wall-clock duration onto the sample clock, keeping the
    /// fractional sample. Whole seconds convert exactly; only the
    /// sub-second part goes through floating point.
    #[must_use]
    pub fn from_duration(duration: Duration, rate: u32) -> Self {
        let whole = duration.as_secs() as i64 * i64::from(rate);
        let subsec =
            f64::from(duration.subsec_nanos()) * f64::from(rate) / 1_000_000_000.0;
        let subsec_count = subsec.trunc();
        Self {
            count: whole + subsec_count as i64,
            fraction: subsec - subsec_count,
            rate,
        }
    }

    /// The whole-sample count (truncated toward zero).
    #[must_use]
    pub const fn sample_count(self) -> i64 {
        self.count
    }

    /// The fractional remainder.
    #[must_use]
    pub const fn sample_fraction(self) -> f64 {
        self.fraction
    }

    /// The span as a fractional sample count.
    #[must_use]
    pub fn subsample_count(self) -> f64 {
        self.count as f64 + self.fraction
    }

    /// The sample rate in Hz.
    #[must_use]
    pub const fn sample_rate(self) -> u32 {
        self.rate
    }

    /// Sum with an equal-rate span, or `None` on a rate mismatch.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        if self.rate != other.rate {
            return None;
        }
        let mut count = self.count + other.count;
        let mut fraction = self.fraction + other.fraction;
        if fraction >= 1.0 {
            count += 1;
            fraction -= 1.0;
        }
        Some(Self {
            count,
            fraction,
            rate: self.rate,
        })
    }

    /// Difference with an equal-rate span, or `None` on a rate mismatch.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        if self.rate != other.rate {
            return None;
        }
        let mut count = self.count - other.count;
        let mut fraction = self.fraction - other.fraction;
        if fraction < 0.0 {
            count -= 1;
            fraction += 1.0;
        }
        Some(Self {
            count,
            fraction,
            rate: self.rate,
        })
    }
}

impl From<SampleDuration> for SubsampleDuration {
    fn from(duration: SampleDuration) -> Self {
        Self {
            count: duration.sample_count(),
            fraction: 0.0,
            rate: duration.sample_rate(),
        }
    }
}

impl PartialEq for SubsampleDuration {
    fn eq(&self, other: &Self) -> bool {
        if self.count == 0 && self.fraction == 0.0 {
            return other.count == 0 && other.fraction == 0.0;
        }
        self.count == other.count && self.fraction == other.fraction && self.rate == other.rate
    }
}

impl Add for SubsampleDuration {
    type Output = SubsampleDuration;

    /// # Panics
    /// Panics when the sample rates differ.
    fn add(self, other: Self) -> Self {
        match self.checked_add(other) {
            Some(sum) => sum,
            None => panic!("sample rates differ: {} vs {}", self.rate, other.rate),
        }
    }
}

impl Sub for SubsampleDuration {
    type Output = SubsampleDuration;

    /// # Panics
    /// Panics when the sample rates differ.
    fn sub(self, other: Self) -> Self {
        match self.checked_sub(other) {
            Some(diff) => diff,
            None => panic!("sample rates differ: {} vs {}", self.rate, other.rate),
        }
    }
}

/// A whole-sample time point on a stream's sample clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct SampleInstant {
    since_epoch: SampleDuration,
}

impl SampleInstant {
    /// The time point `since_epoch` after the stream epoch.
    #[must_use]
    pub const fn new(since_epoch: SampleDuration) -> Self {
        Self { since_epoch }
    }

    /// Elapsed sample time since the stream epoch.
    #[must_use]
    pub const fn since_epoch(self) -> SampleDuration {
        self.since_epoch
    }
}

impl Add<SampleDuration> for SampleInstant {
    type Output = SampleInstant;

    fn add(self, duration: SampleDuration) -> Self {
        Self::new(self.since_epoch + duration)
    }
}

impl Sub<SampleDuration> for SampleInstant {
    type Output = SampleInstant;

    fn sub(self, duration: SampleDuration) -> Self {
        Self::new(self.since_epoch - duration)
    }
}

impl Sub for SampleInstant {
    type Output = SampleDuration;

    fn sub(self, other: Self) -> SampleDuration {
        self.since_epoch - other.since_epoch
    }
}

/// A fractional-sample time point on a stream's sample clock.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SubsampleInstant {
    since_epoch: SubsampleDuration,
}

impl SubsampleInstant {
    /// The time point `since_epoch` after the stream epoch.
    #[must_use]
    pub const fn new(since_epoch: SubsampleDuration) -> Self {
        Self { since_epoch }
    }

    /// Elapsed sample time since the stream epoch.
    #[must_use]
    pub const fn since_epoch(self) -> SubsampleDuration {
        self.since_epoch
    }
}

impl From<SampleInstant> for SubsampleInstant {
    fn from(instant: SampleInstant) -> Self {
        Self::new(instant.since_epoch().into())
    }
}

impl Add<SubsampleDuration> for SubsampleInstant {
    type Output = SubsampleInstant;

    fn add(self, duration: SubsampleDuration) -> Self {
        Self::new(self.since_epoch + duration)
    }
}

impl Sub<SubsampleDuration> for SubsampleInstant {
    type Output = SubsampleInstant;

    fn sub(self, duration: SubsampleDuration) -> Self {
        Self::new(self.since_epoch - duration)
    }
}

impl Sub for SubsampleInstant {
    type Output = SubsampleDuration;

    fn sub(self, other: Self) -> SubsampleDuration {
        self.since_epoch - other.since_epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_duration_arithmetic() {
        let a = SampleDuration::new(100, 48_000);
        let b = SampleDuration::new(28, 48_000);
        assert_eq!((a + b).sample_count(), 128);
        assert_eq!((a - b).sample_count(), 72);
        assert_eq!((b - a).sample_count(), -72);
    }

    #[test]
    fn sample_duration_rate_mismatch_is_checked() {
        let a = SampleDuration::new(100, 48_000);
        let b = SampleDuration::new(100, 44_100);
        assert!(a.checked_add(b).is_none());
        assert!(a.checked_sub(b).is_none());
        assert!(a.partial_cmp(&b).is_none());
    }

    #[test]
    fn zero_durations_are_equal_across_rates() {
        assert_eq!(SampleDuration::new(0, 48_000), SampleDuration::new(0, 44_100));
        assert_ne!(SampleDuration::new(1, 48_000), SampleDuration::new(1, 44_100));
    }

    #[test]
    fn sample_duration_from_wall_clock_truncates() {
        let d = SampleDuration::from_duration(Duration::from_millis(1_500), 48_000);
        assert_eq!(d.sample_count(), 72_000);
        // One nanosecond shy of a full sample still truncates.
        let d = SampleDuration::from_duration(Duration::from_nanos(20_832), 48_000);
        assert_eq!(d.sample_count(), 0);
        let d = SampleDuration::from_duration(Duration::from_nanos(20_834), 48_000);
        assert_eq!(d.sample_count(), 1);
    }

    #[test]
    fn sample_duration_to_wall_clock() {
        let d = SampleDuration::new(72_000, 48_000);
        assert_eq!(d.to_duration(), Duration::from_millis(1_500));
        // Negative spans have no wall-clock representation.
        assert_eq!(SampleDuration::new(-48_000, 48_000).to_duration(), Duration::ZERO);
    }

    #[test]
    fn subsample_carry_on_add() {
        let a = SubsampleDuration::from_samples_f64(1.75, 48_000);
        let b = SubsampleDuration::from_samples_f64(0.5, 48_000);
        let sum = a + b;
        assert_eq!(sum.sample_count(), 2);
        assert!((sum.sample_fraction() - 0.25).abs() < 1e-12);
        assert!((sum.subsample_count() - 2.25).abs() < 1e-12);

        // Fractions summing to exactly one carry into the whole count.
        let exact = SubsampleDuration::from_samples_f64(0.5, 48_000)
            + SubsampleDuration::from_samples_f64(1.5, 48_000);
        assert_eq!(exact.sample_count(), 2);
        assert_eq!(exact.sample_fraction(), 0.0);
    }

    #[test]
    fn subsample_borrow_on_sub() {
        let a = SubsampleDuration::from_samples_f64(2.25, 48_000);
        let b = SubsampleDuration::from_samples_f64(0.5, 48_000);
        let diff = a - b;
        assert_eq!(diff.sample_count(), 1);
        assert!((diff.sample_fraction() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn subsample_from_wall_clock_keeps_fraction() {
        // 1.5 samples at 48 kHz is 31.25 µs.
        let d = SubsampleDuration::from_duration(Duration::from_nanos(31_250), 48_000);
        assert_eq!(d.sample_count(), 1);
        assert!((d.sample_fraction() - 0.5).abs() < 1e-9);
        // Whole seconds convert exactly even for large durations.
        let d = SubsampleDuration::from_duration(Duration::from_secs(100_000), 48_000);
        assert_eq!(d.sample_count(), 4_800_000_000);
        assert_eq!(d.sample_fraction(), 0.0);
    }

    #[test]
    fn instant_arithmetic() {
        let epoch = SampleInstant::new(SampleDuration::new(0, 48_000));
        let later = epoch + SampleDuration::new(480, 48_000);
        assert_eq!((later - epoch).sample_count(), 480);
        let earlier = later - SampleDuration::new(48, 48_000);
        assert_eq!((later - earlier).sample_count(), 48);
    }

    #[test]
    fn subsample_instant_arithmetic() {
        let epoch = SubsampleInstant::new(SubsampleDuration::from_samples_f64(0.0, 48_000));
        let later = epoch + SubsampleDuration::from_samples_f64(10.5, 48_000);
        assert!(((later - epoch).subsample_count() - 10.5).abs() < 1e-12);
        let earlier = later - SubsampleDuration::from_samples_f64(0.25, 48_000);
        assert!((earlier.since_epoch().subsample_count() - 10.25).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "sample rates differ")]
    fn mismatched_rate_add_panics() {
        let _ = SampleDuration::new(1, 48_000) + SampleDuration::new(1, 44_100);
    }
}
