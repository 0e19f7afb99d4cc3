//! Error types for the token bucket limiter.

use thiserror::Error;

/// Main error type for limiter construction and configuration.
#[derive(Error, Debug)]
pub enum TokenBucketError {
    /// Refill rate is zero, negative or not a number
    #[error("Invalid rate: {0} (must be a finite number greater than zero)")]
    InvalidRate(f64),

    /// Burst capacity is negative or not a number
    #[error("Invalid burst: {0} (must be a finite number, zero or greater)")]
    InvalidBurst(f64),

    /// Initial token balance is not a finite number
    #[error("Invalid initial tokens: {0} (must be a finite number)")]
    InvalidTokens(f64),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for limiter operations.
pub type Result<T> = std::result::Result<T, TokenBucketError>;
