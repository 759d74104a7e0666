use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Analysis parameters shared by every view.
///
/// Serializable as TOML; every field has a sane default, so a partial
/// config file only overrides what it names.
///
/// # Example
/// ```
/// use rq_core::AnalysisConfig;
/// let config = AnalysisConfig::default();
/// assert_eq!(config.sample_rate, 44_100);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // === Signal ===
    /// Sample rate of the generated signals, in Hz.
    pub sample_rate: u32,
    /// Length of the generated signals, in samples.
    pub num_samples: usize,
    /// Tone frequency in Hz.
    pub frequency: f64,
    /// Tone amplitude, full scale = 1.0.
    pub amplitude: f64,

    // === Analysis ===
    /// FFT window size for the spectrum views.
    pub fft_size: usize,
    /// Histogram bin count for the dither density views.
    pub histogram_bins: usize,
    /// Number of noise samples drawn for the density views.
    pub noise_samples: usize,

    // === Rendu ===
    /// Plot width in pixels.
    pub plot_width: u32,
    /// Plot height in pixels.
    pub plot_height: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            num_samples: 65_536,
            frequency: 1_000.0,
            amplitude: 0.8,
            fft_size: 4_096,
            histogram_bins: 100,
            noise_samples: 1_000_000,
            plot_width: 1_280,
            plot_height: 720,
        }
    }
}

impl AnalysisConfig {
    /// Check that the parameters describe a renderable analysis.
    ///
    /// # Errors
    /// Returns an error naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            anyhow::bail!("sample_rate must be > 0");
        }
        if self.num_samples == 0 {
            anyhow::bail!("num_samples must be > 0");
        }
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            anyhow::bail!("frequency must be finite and > 0");
        }
        if !self.amplitude.is_finite() || self.amplitude <= 0.0 || self.amplitude > 1.0 {
            anyhow::bail!("amplitude must be within (0, 1]");
        }
        if self.fft_size == 0 {
            anyhow::bail!("fft_size must be > 0");
        }
        if self.histogram_bins == 0 {
            anyhow::bail!("histogram_bins must be > 0");
        }
        if self.plot_width == 0 || self.plot_height == 0 {
            anyhow::bail!("plot dimensions must be > 0");
        }
        Ok(())
    }
}

/// Load and validate a TOML config file.
///
/// # Errors
/// Returns an error when the file cannot be read, parsed, or validated.
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: AnalysisConfig =
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    log::debug!("analysis config loaded from {}", path.display());
    Ok(config)
}
