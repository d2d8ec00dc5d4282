//! Error taxonomy for the series layer.
//!
//! Most transformations never fail: malformed input is defaulted at the
//! contract boundary and logged. Only caller-side contract violations surface
//! as a [`SeriesError`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    /// The caller passed a value outside the function's domain (e.g. rank 0).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A backend document did not match its contract.
    #[error("Malformed input: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, SeriesError>;
