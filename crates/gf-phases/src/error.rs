//! Phase and activity-model errors.

use gf_core::GfError;
use thiserror::Error;

/// Result type for phase operations.
pub type PhaseResult<T> = Result<T, PhaseError>;

/// Errors that can occur during phase property calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhaseError {
    /// Non-physical values (negative moles, empty phase, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Operation not supported by this model (e.g., non-binary mixtures).
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },
}

impl From<PhaseError> for GfError {
    fn from(err: PhaseError) -> Self {
        match err {
            PhaseError::NonPhysical { what } => GfError::Invariant { what },
            PhaseError::InvalidArg { what } => GfError::InvalidArg { what },
            PhaseError::NotSupported { what } => GfError::Invariant { what },
        }
    }
}
