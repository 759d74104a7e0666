//! Delay-locked loops between the sample clock and a wall clock.
//!
//! Both loops follow the second-order design from Adriaensen's "Using a
//! DLL to filter time" paper: a critically-damped PI loop (b = √2·ω,
//! c = ω²) that learns the true clock ratio from the error between
//! projected and observed time. Wall-clock values are `Duration` offsets
//! from the stream start; the maths runs in f64 nanoseconds.
//!
//! Projections are windows. After the first call, each window must start
//! exactly where the previous one ended; the loop measures how far the
//! previous projection drifted from the observed clock and corrects both
//! the projected end point and the learned slope.

use std::f64::consts::{SQRT_2, TAU};
use std::time::Duration;

use crate::clock::{SampleInstant, SubsampleDuration, SubsampleInstant};
use crate::error::CoreError;

/// Loop bandwidth in Hz.
const BANDWIDTH: f64 = 0.1;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

fn duration_to_ns(duration: Duration) -> f64 {
    duration.as_secs_f64() * NANOS_PER_SEC
}

fn ns_to_duration(ns: f64) -> Duration {
    Duration::from_secs_f64(ns.max(0.0) / NANOS_PER_SEC)
}

/// Projects sample-clock windows onto the wall clock.
pub struct ForwardDll {
    b: f64,
    c: f64,
    clock_ns_per_sample: f64,
    projection_end_clock_ns: Option<f64>,
    previous_end_sample: SampleInstant,
}

impl ForwardDll {
    /// A loop seeded with the stream's nominal sample rate.
    #[must_use]
    pub fn new(nominal_sample_rate: u32) -> Self {
        let omega = TAU * BANDWIDTH / f64::from(nominal_sample_rate);
        Self {
            b: SQRT_2 * omega,
            c: omega * omega,
            clock_ns_per_sample: NANOS_PER_SEC / f64::from(nominal_sample_rate),
            projection_end_clock_ns: None,
            previous_end_sample: SampleInstant::default(),
        }
    }

    /// Project the sample window `[start_sample, end_sample]` onto the
    /// wall clock, given the currently observed pair of clocks.
    ///
    /// # Errors
    /// Fails when the window is reversed, does not continue the previous
    /// window, or mixes sample rates.
    pub fn project(
        &mut self,
        current_clock: Duration,
        current_sample: SampleInstant,
        start_sample: SampleInstant,
        end_sample: SampleInstant,
    ) -> Result<(Duration, Duration), CoreError> {
        let window = checked_sample_delta(end_sample, start_sample)?;
        if window < 0 {
            return Err(CoreError::ProjectionOrder);
        }

        let current_clock_ns = duration_to_ns(current_clock);

        let Some(end_clock_ns) = self.projection_end_clock_ns else {
            // First projection: seed linearly from the nominal rate.
            let start_offset = checked_sample_delta(start_sample, current_sample)? as f64;
            let end_offset = checked_sample_delta(end_sample, current_sample)? as f64;
            let start_clock_ns =
                current_clock_ns + (start_offset * self.clock_ns_per_sample).round();
            let end_clock_ns =
                current_clock_ns + (end_offset * self.clock_ns_per_sample).round();
            self.projection_end_clock_ns = Some(end_clock_ns);
            self.previous_end_sample = end_sample;
            return Ok((ns_to_duration(start_clock_ns), ns_to_duration(end_clock_ns)));
        };

        if start_sample != self.previous_end_sample {
            return Err(CoreError::ProjectionDiscontinuity);
        }
        if end_sample == self.previous_end_sample {
            let end = ns_to_duration(end_clock_ns);
            return Ok((end, end));
        }

        // How far did the previous projection drift from the clock we
        // actually observed?
        let elapsed_samples = checked_sample_delta(current_sample, self.previous_end_sample)? as f64;
        let projected_clock_ns = elapsed_samples * self.clock_ns_per_sample;
        let actual_clock_ns = current_clock_ns - end_clock_ns;
        let clock_error_ns = actual_clock_ns - projected_clock_ns;

        let start_clock_ns = end_clock_ns;
        let window = window as f64;
        let error_multiplier = window * clock_error_ns;
        self.clock_ns_per_sample += self.c * error_multiplier;
        let end_delta_ns =
            ((self.b * error_multiplier) + (self.clock_ns_per_sample * window)).round();
        let end_clock_ns = end_clock_ns + end_delta_ns;
        self.projection_end_clock_ns = Some(end_clock_ns);
        self.previous_end_sample = end_sample;

        Ok((ns_to_duration(start_clock_ns), ns_to_duration(end_clock_ns)))
    }
}

/// Projects wall-clock windows onto the sample clock.
pub struct ReverseDll {
    b: f64,
    c: f64,
    samples_per_clock_ns: f64,
    projection_end_sample: Option<SubsampleInstant>,
    previous_end_clock: Duration,
}

impl ReverseDll {
    /// A loop seeded with the stream's nominal sample rate.
    #[must_use]
    pub fn new(nominal_sample_rate: u32) -> Self {
        let omega = TAU * BANDWIDTH / NANOS_PER_SEC;
        Self {
            b: SQRT_2 * omega,
            c: omega * omega,
            samples_per_clock_ns: f64::from(nominal_sample_rate) / NANOS_PER_SEC,
            projection_end_sample: None,
            previous_end_clock: Duration::ZERO,
        }
    }

    /// Project the wall-clock window `[start_clock, end_clock]` onto the
    /// sample clock, given the currently observed pair of clocks.
    ///
    /// # Errors
    /// Fails when the window is reversed, does not continue the previous
    /// window, or mixes sample rates.
    pub fn project(
        &mut self,
        current_clock: Duration,
        current_sample: SampleInstant,
        start_clock: Duration,
        end_clock: Duration,
    ) -> Result<(SubsampleInstant, SubsampleInstant), CoreError> {
        if end_clock < start_clock {
            return Err(CoreError::ProjectionOrder);
        }

        let rate = current_sample.since_epoch().sample_rate();
        let current_clock_ns = duration_to_ns(current_clock);

        let Some(end_sample) = self.projection_end_sample else {
            let start_offset =
                (duration_to_ns(start_clock) - current_clock_ns) * self.samples_per_clock_ns;
            let end_offset =
                (duration_to_ns(end_clock) - current_clock_ns) * self.samples_per_clock_ns;
            let current = SubsampleInstant::from(current_sample);
            let start_sample = current + SubsampleDuration::from_samples_f64(start_offset, rate);
            let end_sample = current + SubsampleDuration::from_samples_f64(end_offset, rate);
            self.projection_end_sample = Some(end_sample);
            self.previous_end_clock = end_clock;
            return Ok((start_sample, end_sample));
        };

        if start_clock != self.previous_end_clock {
            return Err(CoreError::ProjectionDiscontinuity);
        }
        if end_clock == start_clock {
            return Ok((end_sample, end_sample));
        }

        let elapsed_clock_ns = current_clock_ns - duration_to_ns(self.previous_end_clock);
        let projected_samples = elapsed_clock_ns * self.samples_per_clock_ns;
        let actual_samples = checked_subsample_delta(current_sample, end_sample, rate)?;
        let sample_error = actual_samples - projected_samples;

        let start_sample = end_sample;
        let window_ns = duration_to_ns(end_clock) - duration_to_ns(start_clock);
        let error_multiplier = window_ns * sample_error;
        self.samples_per_clock_ns += self.c * error_multiplier;
        let end_delta_samples =
            (self.b * error_multiplier) + (self.samples_per_clock_ns * window_ns);
        let end_sample =
            end_sample + SubsampleDuration::from_samples_f64(end_delta_samples, rate);
        self.projection_end_sample = Some(end_sample);
        self.previous_end_clock = end_clock;

        Ok((start_sample, end_sample))
    }
}

fn checked_sample_delta(a: SampleInstant, b: SampleInstant) -> Result<i64, CoreError> {
    a.since_epoch()
        .checked_sub(b.since_epoch())
        .map(super::clock::SampleDuration::sample_count)
        .ok_or(CoreError::RateMismatch {
            left: a.since_epoch().sample_rate(),
            right: b.since_epoch().sample_rate(),
        })
}

fn checked_subsample_delta(
    a: SampleInstant,
    b: SubsampleInstant,
    rate: u32,
) -> Result<f64, CoreError> {
    SubsampleInstant::from(a)
        .since_epoch()
        .checked_sub(b.since_epoch())
        .map(SubsampleDuration::subsample_count)
        .ok_or(CoreError::RateMismatch {
            left: rate,
            right: b.since_epoch().sample_rate(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SampleDuration;

    fn instant(count: i64, rate: u32) -> SampleInstant {
        SampleInstant::new(SampleDuration::new(count, rate))
    }

    const RATE: u32 = 48_000;
    const BLOCK: i64 = 480;

    #[test]
    fn forward_first_projection_uses_nominal_rate() {
        let mut dll = ForwardDll::new(RATE);
        let result = dll.project(
            Duration::from_secs(1),
            instant(0, RATE),
            instant(0, RATE),
            instant(BLOCK, RATE),
        );
        let Ok((start, end)) = result else {
            panic!("projection failed");
        };
        assert_eq!(start, Duration::from_secs(1));
        assert_eq!(end, Duration::from_secs(1) + Duration::from_millis(10));
    }

    #[test]
    fn forward_rejects_reversed_window() {
        let mut dll = ForwardDll::new(RATE);
        let result = dll.project(
            Duration::ZERO,
            instant(0, RATE),
            instant(BLOCK, RATE),
            instant(0, RATE),
        );
        assert!(matches!(result, Err(CoreError::ProjectionOrder)));
    }

    #[test]
    fn forward_rejects_discontinuous_window() {
        let mut dll = ForwardDll::new(RATE);
        let first = dll.project(
            Duration::ZERO,
            instant(0, RATE),
            instant(0, RATE),
            instant(BLOCK, RATE),
        );
        assert!(first.is_ok());
        let second = dll.project(
            Duration::from_millis(10),
            instant(BLOCK, RATE),
            instant(BLOCK + 1, RATE),
            instant(2 * BLOCK, RATE),
        );
        assert!(matches!(second, Err(CoreError::ProjectionDiscontinuity)));
    }

    #[test]
    fn forward_converges_on_a_fast_clock() {
        // The observed clock runs 0.5% faster than nominal.
        let true_ns_per_sample = (NANOS_PER_SEC / f64::from(RATE)) * 1.005;
        let true_block_ns = BLOCK as f64 * true_ns_per_sample;

        let mut dll = ForwardDll::new(RATE);
        let mut first_error = 0.0_f64;
        let mut last_error = 0.0_f64;
        for k in 0..4000_i64 {
            let current_clock =
                Duration::from_secs_f64(k as f64 * true_block_ns / NANOS_PER_SEC);
            let result = dll.project(
                current_clock,
                instant(k * BLOCK, RATE),
                instant(k * BLOCK, RATE),
                instant((k + 1) * BLOCK, RATE),
            );
            let Ok((start, end)) = result else {
                panic!("projection failed at block {k}");
            };
            let projected_ns = duration_to_ns(end) - duration_to_ns(start);
            let error = (projected_ns - true_block_ns).abs();
            if k == 0 {
                first_error = error;
            }
            last_error = error;
        }
        // Started 0.5% off; must end well under 0.05%.
        assert!(first_error > 40_000.0, "unexpected initial error {first_error}");
        assert!(
            last_error < true_block_ns * 0.000_5,
            "did not converge: {last_error} ns"
        );
    }

    #[test]
    fn reverse_first_projection_uses_nominal_rate() {
        let mut dll = ReverseDll::new(RATE);
        let result = dll.project(
            Duration::ZERO,
            instant(0, RATE),
            Duration::ZERO,
            Duration::from_millis(10),
        );
        let Ok((start, end)) = result else {
            panic!("projection failed");
        };
        assert!(start.since_epoch().subsample_count().abs() < 1e-9);
        assert!((end.since_epoch().subsample_count() - BLOCK as f64).abs() < 1e-6);
    }

    #[test]
    fn reverse_converges_on_a_slow_sample_clock() {
        // Samples actually arrive 0.5% slower than nominal: after t ns the
        // stream has advanced t * nominal_rate * 0.995 / 1e9 samples.
        let true_samples_per_ns = f64::from(RATE) * 0.995 / NANOS_PER_SEC;
        let block_ns = 10_000_000.0_f64;
        let true_block_samples = block_ns * true_samples_per_ns;

        let mut dll = ReverseDll::new(RATE);
        let mut last_error = 0.0_f64;
        for k in 0..4000_i64 {
            let now_ns = k as f64 * block_ns;
            let current_sample = instant((now_ns * true_samples_per_ns).round() as i64, RATE);
            let result = dll.project(
                Duration::from_secs_f64(now_ns / NANOS_PER_SEC),
                current_sample,
                Duration::from_secs_f64(now_ns / NANOS_PER_SEC),
                Duration::from_secs_f64((now_ns + block_ns) / NANOS_PER_SEC),
            );
            let Ok((start, end)) = result else {
                panic!("projection failed at block {k}");
            };
            let projected = (end - start).subsample_count();
            last_error = (projected - true_block_samples).abs();
        }
        assert!(
            last_error < true_block_samples * 0.000_5,
            "did not converge: {last_error} samples"
        );
    }
}
