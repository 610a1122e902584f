//! gf-solver: the Newton-like correction step for multi-phase
//! Gibbs-minimization equilibrium.
//!
//! Given current mole numbers, per-reaction driving forces, and the
//! stoichiometry relating non-basis species to the component basis, this
//! crate computes a guarded mole-number adjustment per formation reaction
//! (`adjust`), estimates numerically safe diagonal curvature (`hessian`),
//! re-evaluates reaction free-energy residuals at trial compositions
//! (`residual`), and refines step lengths with a bounded line search
//! (`line_search`).
//!
//! The enclosing iteration owns the shared arrays (`EquilState`) and must
//! recompute the component basis whenever the adjustment pass reports a
//! `BasisChange` other than `Intact`. Everything here is strictly
//! sequential; exclusivity is enforced by `&mut` borrows, not locks.

pub mod adjust;
pub mod diag;
pub mod error;
pub mod hessian;
pub mod jacobian;
pub mod line_search;
pub mod residual;
pub mod state;

pub use adjust::{
    BasisChange, PHASE_BIRTH_SEED, PHASE_BIRTH_THRESHOLD, diagonal_curvature,
    reaction_adjustments,
};
pub use diag::{
    LineSearchNote, NoDiagnostics, ReactionNote, StepDiagnostics, TracingDiagnostics,
};
pub use error::{SolverError, SolverResult};
pub use hessian::{act_coeff_curvature, hessian_diag_adjusted};
pub use jacobian::update_act_coeff_jacobian;
pub use line_search::{MAX_BISECTIONS, line_search};
pub use residual::recalc_delta_g;
pub use state::{EquilState, Workspace};
