//! Error types for the step core.

use gf_core::GfError;
use gf_phases::PhaseError;
use thiserror::Error;

/// Errors that can occur during the correction step.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("State setup error: {what}")]
    State { what: String },

    /// The ideal-solution diagonal curvature handed to the Hessian estimator
    /// was not strictly positive. This is a logic error upstream, never a
    /// recoverable runtime condition.
    #[error("Non-positive ideal curvature for reaction {irxn}: {value}")]
    NonPositiveCurvature { irxn: usize, value: f64 },

    #[error("Phase model error: {0}")]
    Phase(#[from] PhaseError),

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for GfError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::State { what: _ } => GfError::InvalidArg {
                what: "state setup",
            },
            SolverError::NonPositiveCurvature { .. } => GfError::Invariant {
                what: "hessian curvature",
            },
            SolverError::Phase(e) => e.into(),
            SolverError::Numeric { what: _ } => GfError::InvalidArg { what: "numeric" },
        }
    }
}
