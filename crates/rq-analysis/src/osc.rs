//! Periodic waveform generators.

use std::f64::consts::TAU;
use std::str::FromStr;

use crate::error::AnalysisError;

/// Supported waveform shapes, one period per unit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    /// Pure sine.
    #[default]
    Sine,
    /// ±1 square, high in the second half of the period.
    Square,
    /// Triangle from −1 at phase 0 up to +1 at phase 0.5.
    Triangle,
    /// Rising ramp from −1 to +1.
    Sawtooth,
}

impl Waveform {
    /// Sample the waveform at `position`, in periods.
    #[must_use]
    pub fn value_at(self, position: f64) -> f64 {
        let phase = position.rem_euclid(1.0);
        match self {
            Waveform::Sine => (TAU * position).sin(),
            Waveform::Square => {
                if phase >= 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 1.0 - (2.0 * (2.0 * phase - 1.0)).abs(),
            Waveform::Sawtooth => 2.0 * phase - 1.0,
        }
    }
}

impl FromStr for Waveform {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sine" => Ok(Waveform::Sine),
            "square" => Ok(Waveform::Square),
            "triangle" => Ok(Waveform::Triangle),
            "sawtooth" | "saw" => Ok(Waveform::Sawtooth),
            other => Err(AnalysisError::UnknownWaveform(other.to_string())),
        }
    }
}

/// A tone at a fixed frequency, sample rate, and amplitude.
#[derive(Debug, Clone, Copy)]
pub struct ToneGenerator {
    /// Waveform shape.
    pub waveform: Waveform,
    /// Tone frequency in Hz.
    pub frequency: f64,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Peak amplitude, full scale = 1.0.
    pub amplitude: f64,
}

impl ToneGenerator {
    /// Samples per waveform period.
    #[must_use]
    pub fn samples_per_cycle(&self) -> f64 {
        f64::from(self.sample_rate) / self.frequency
    }

    /// The amplitude-scaled sample at index `n`.
    #[must_use]
    pub fn value(&self, n: usize) -> f64 {
        self.amplitude * self.waveform.value_at(n as f64 / self.samples_per_cycle())
    }

    /// Generate `num_samples` samples from index 0.
    #[must_use]
    pub fn generate(&self, num_samples: usize) -> Vec<f64> {
        (0..num_samples).map(|n| self.value(n)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(waveform: Waveform) -> ToneGenerator {
        ToneGenerator {
            waveform,
            frequency: 1_000.0,
            sample_rate: 44_100,
            amplitude: 1.0,
        }
    }

    #[test]
    fn sine_starts_at_zero_and_stays_in_range() {
        let sine = tone(Waveform::Sine);
        let samples = sine.generate(44_100);
        assert!(samples[0].abs() < 1e-12);
        for s in &samples {
            assert!(s.abs() <= 1.0);
        }
    }

    #[test]
    fn sine_peaks_at_quarter_period() {
        let sine = ToneGenerator {
            waveform: Waveform::Sine,
            frequency: 1_000.0,
            sample_rate: 44_100,
            amplitude: 0.8,
        };
        // samples_per_cycle = 44.1, quarter period ~ sample 11.
        let quarter = sine.value(11);
        assert!(quarter > 0.79, "expected near-peak, got {quarter}");
    }

    #[test]
    fn square_levels() {
        assert_eq!(Waveform::Square.value_at(0.25), -1.0);
        assert_eq!(Waveform::Square.value_at(0.75), 1.0);
        assert_eq!(Waveform::Square.value_at(1.25), -1.0);
    }

    #[test]
    fn triangle_extremes() {
        assert_eq!(Waveform::Triangle.value_at(0.0), -1.0);
        assert_eq!(Waveform::Triangle.value_at(0.5), 1.0);
        assert!((Waveform::Triangle.value_at(0.25)).abs() < 1e-12);
    }

    #[test]
    fn sawtooth_ramps() {
        assert_eq!(Waveform::Sawtooth.value_at(0.0), -1.0);
        assert_eq!(Waveform::Sawtooth.value_at(0.5), 0.0);
        assert!((Waveform::Sawtooth.value_at(0.999) - 0.998).abs() < 1e-12);
    }

    #[test]
    fn waveform_parsing() {
        assert_eq!("sine".parse::<Waveform>(), Ok(Waveform::Sine));
        assert_eq!("SQUARE".parse::<Waveform>(), Ok(Waveform::Square));
        assert_eq!("saw".parse::<Waveform>(), Ok(Waveform::Sawtooth));
        assert!("noise".parse::<Waveform>().is_err());
    }

    #[test]
    fn amplitude_scales_output() {
        let triangle = ToneGenerator {
            amplitude: 0.5,
            ..tone(Waveform::Triangle)
        };
        for s in triangle.generate(1_000) {
            assert!(s.abs() <= 0.5 + 1e-12);
        }
    }
}
