/// Signal generation and analysis for requant.
///
/// Tone generators, the requantization pipelines the demo compares,
/// windowed FFT spectra, and sample histograms.

pub mod error;
pub mod histogram;
pub mod osc;
pub mod pipeline;
pub mod spectrum;

pub use error::AnalysisError;
pub use histogram::Histogram;
pub use osc::{ToneGenerator, Waveform};
pub use pipeline::TonePlan;
pub use spectrum::SpectrumAnalyzer;
