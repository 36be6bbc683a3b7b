use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by band planning and spectrum aggregation.
///
/// None of these are retryable: the caller has to fix its inputs and call again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("frame has {actual} magnitude bins, aggregator was configured for {expected}")]
    FrameShapeMismatch { expected: usize, actual: usize },

    #[error("aggregator is not configured")]
    NotConfigured,
}
