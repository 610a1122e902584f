//! Shared error vocabulary for the workspace.
//!
//! Downstream crates define richer error enums and convert into `GfError`
//! at the outermost boundary, so callers embedding the solver only have to
//! match on one type.

use thiserror::Error;

pub type GfResult<T> = Result<T, GfError>;

#[derive(Error, Debug)]
pub enum GfError {
    /// A NaN or infinity escaped a numeric kernel.
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// An index table was consulted outside its bounds.
    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// A structural invariant (phase membership, dimension agreement,
    /// positivity) was violated.
    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
