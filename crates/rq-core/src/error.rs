use thiserror::Error;

/// Errors originating from the core crate.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Two sample-clock values with different sample rates were combined.
    #[error("sample rates differ: {left} vs {right}")]
    RateMismatch {
        /// Rate of the left-hand operand.
        left: u32,
        /// Rate of the right-hand operand.
        right: u32,
    },

    /// A projection window ends before it starts.
    #[error("projection end is before projection start")]
    ProjectionOrder,

    /// A projection window does not start where the previous one ended.
    #[error("projection does not continue from the previous projection end")]
    ProjectionDiscontinuity,
}
