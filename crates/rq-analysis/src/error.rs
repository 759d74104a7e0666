use thiserror::Error;

/// Errors originating from the analysis crate.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalysisError {
    /// Histogram range is empty, reversed, or not finite.
    #[error("histogram range is empty or not finite")]
    InvalidRange,

    /// Unknown waveform name.
    #[error("unknown waveform: {0} (expected sine, square, triangle, or sawtooth)")]
    UnknownWaveform(String),
}
