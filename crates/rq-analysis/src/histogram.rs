//! Fixed-bin histograms for the dither density views.

use crate::error::AnalysisError;

/// A histogram over a fixed range with equally sized bins.
///
/// Samples exactly on the upper edge land in the last bin (the way the
/// usual plotting libraries bin); samples outside the range are dropped.
///
/// # Example
/// ```
/// use rq_analysis::Histogram;
/// let mut hist = Histogram::new(-1.0, 1.0, 100)?;
/// hist.accumulate(&[0.0, 0.5, -0.5]);
/// assert_eq!(hist.total(), 3);
/// # Ok::<(), rq_analysis::AnalysisError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Histogram {
    min: f64,
    max: f64,
    counts: Vec<u64>,
    total: u64,
}

impl Histogram {
    /// An empty histogram over `[min, max]` with `bins` bins.
    ///
    /// # Errors
    /// Fails when the range is empty, reversed, not finite, or `bins`
    /// is 0.
    pub fn new(min: f64, max: f64, bins: usize) -> Result<Self, AnalysisError> {
        if bins == 0 || !min.is_finite() || !max.is_finite() || min >= max {
            return Err(AnalysisError::InvalidRange);
        }
        Ok(Self {
            min,
            max,
            counts: vec![0; bins],
            total: 0,
        })
    }

    /// Count `samples` into the bins. Out-of-range and non-finite
    /// samples are dropped.
    pub fn accumulate(&mut self, samples: &[f32]) {
        let bins = self.counts.len();
        let scale = bins as f64 / (self.max - self.min);
        for &sample in samples {
            let value = f64::from(sample);
            if !value.is_finite() || value < self.min || value > self.max {
                continue;
            }
            let bin = (((value - self.min) * scale) as usize).min(bins - 1);
            self.counts[bin] += 1;
            self.total += 1;
        }
    }

    /// Per-bin counts.
    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Number of samples counted so far.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Width of one bin.
    #[must_use]
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    /// Center value of each bin.
    #[must_use]
    pub fn bin_centers(&self) -> Vec<f64> {
        let width = self.bin_width();
        (0..self.counts.len())
            .map(|i| self.min + (i as f64 + 0.5) * width)
            .collect()
    }

    /// Probability density per bin: integrates to 1 over the range
    /// (all zeros while the histogram is empty).
    #[must_use]
    pub fn density(&self) -> Vec<f64> {
        if self.total == 0 {
            return vec![0.0; self.counts.len()];
        }
        let norm = 1.0 / (self.total as f64 * self.bin_width());
        self.counts.iter().map(|&c| c as f64 * norm).collect()
    }
}
