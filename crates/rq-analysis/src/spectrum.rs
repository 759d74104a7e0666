//! Windowed FFT spectrum analysis.

use realfft::RealFftPlanner;

/// Magnitude floor for the dB views.
const DB_FLOOR: f32 = -200.0;

/// FFT pipeline: windowed real FFT using realfft.
///
/// Pre-allocates the FFT plan and scratch buffers so repeated spectra
/// allocate nothing but their output.
///
/// # Example
/// ```
/// use rq_analysis::SpectrumAnalyzer;
/// let mut fft = SpectrumAnalyzer::new(2048);
/// let spectrum = fft.magnitudes(&vec![0.0_f32; 2048]);
/// assert_eq!(spectrum.len(), 1025); // N/2 + 1
/// ```
pub struct SpectrumAnalyzer {
    fft_size: usize,
    input_buf: Vec<f32>,
    spectrum_buf: Vec<realfft::num_complex::Complex<f32>>,
    scratch: Vec<realfft::num_complex::Complex<f32>>,
    plan: std::sync::Arc<dyn realfft::RealToComplex<f32>>,
    /// Hann window coefficients.
    window: Vec<f32>,
}

impl SpectrumAnalyzer {
    /// Create an analyzer with the given window size.
    ///
    /// # Panics
    /// Panics if `size` is 0.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "FFT size must be > 0");

        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(size);

        let input_buf = plan.make_input_vec();
        let spectrum_buf = plan.make_output_vec();
        let scratch = plan.make_scratch_vec();

        // Hann window
        let window: Vec<f32> = (0..size)
            .map(|i| {
                0.5 * (1.0
                    - (2.0 * std::f32::consts::PI * i as f32 / (size as f32 - 1.0)).cos())
            })
            .collect();

        Self {
            fft_size: size,
            input_buf,
            spectrum_buf,
            scratch,
            plan,
            window,
        }
    }

    /// Process `samples` through the windowed FFT.
    ///
    /// Input shorter than the window is zero-padded; input longer than
    /// the window is truncated. Returns the spectrum magnitude
    /// (N/2+1 bins), normalized by the window size.
    pub fn magnitudes(&mut self, samples: &[f32]) -> Vec<f32> {
        let n = self.fft_size.min(samples.len());

        // Copy and window
        for (i, slot) in self.input_buf.iter_mut().enumerate() {
            *slot = if i < n {
                samples[i] * self.window[i]
            } else {
                0.0
            };
        }

        // Forward FFT
        if self
            .plan
            .process_with_scratch(&mut self.input_buf, &mut self.spectrum_buf, &mut self.scratch)
            .is_err()
        {
            log::warn!("FFT processing failed, returning silence spectrum");
            return vec![0.0; self.spectrum_buf.len()];
        }

        // Magnitude
        self.spectrum_buf
            .iter()
            .map(|c| (c.re * c.re + c.im * c.im).sqrt() / self.fft_size as f32)
            .collect()
    }

    /// The windowed spectrum in dBFS, floored at −200 dB.
    pub fn magnitudes_db(&mut self, samples: &[f32]) -> Vec<f32> {
        to_db(&self.magnitudes(samples))
    }

    /// Welch-style averaged spectrum in dB: the mean of the linear
    /// magnitudes over successive windows `hop` samples apart.
    ///
    /// Falls back to a single (zero-padded) window when `samples` is
    /// shorter than the window or `hop` is 0.
    pub fn averaged_db(&mut self, samples: &[f32], hop: usize) -> Vec<f32> {
        if hop == 0 || samples.len() <= self.fft_size {
            return self.magnitudes_db(samples);
        }

        let mut mean = vec![0.0_f32; self.bins()];
        let mut windows = 0_u32;
        let mut start = 0;
        while start + self.fft_size <= samples.len() {
            for (acc, m) in mean
                .iter_mut()
                .zip(self.magnitudes(&samples[start..start + self.fft_size]))
            {
                *acc += m;
            }
            windows += 1;
            start += hop;
        }
        for acc in &mut mean {
            *acc /= windows as f32;
        }
        to_db(&mean)
    }

    /// Number of output bins (N/2 + 1).
    #[must_use]
    pub fn bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Center frequency of bin `i` at `sample_rate`.
    #[must_use]
    pub fn bin_frequency(&self, i: usize, sample_rate: u32) -> f64 {
        i as f64 * f64::from(sample_rate) / self.fft_size as f64
    }

    /// FFT window size.
    #[must_use]
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

fn to_db(magnitudes: &[f32]) -> Vec<f32> {
    magnitudes
        .iter()
        .map(|&m| {
            if m <= 0.0 {
                DB_FLOOR
            } else {
                (20.0 * m.log10()).max(DB_FLOOR)
            }
        })
        .collect()
}
