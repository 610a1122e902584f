//! Activity model trait.

use nalgebra::{DMatrix, DVector};

use crate::error::PhaseResult;
use crate::phase::Phase;

/// Floor applied to mole fractions before taking logarithms, so that a
/// species at exactly zero moles yields a large negative (but finite)
/// chemical potential instead of -inf.
pub const MOLE_FRACTION_FLOOR: f64 = 1e-200;

/// Trait for phase activity models.
///
/// Implementations compute RT-normalized chemical potentials and the
/// derivatives of ln(activity coefficient) with respect to mole numbers for
/// the member species of one phase. All vectors are indexed by *global*
/// species index; a model only reads and writes the entries belonging to the
/// phase it is handed.
///
/// Implementations must be thread-safe (Send + Sync) so the enclosing solver
/// can be moved across threads between iterations.
pub trait ActivityModel: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Chemical potentials for every member species of `phase` at the given
    /// mole numbers.
    ///
    /// Writes activity coefficients and RT-normalized chemical potentials
    /// into the per-species slots of `act_coeff` and `chem_pot`. Entries for
    /// species outside the phase are left untouched.
    fn chem_potentials(
        &self,
        phase: &Phase,
        mole_numbers: &DVector<f64>,
        act_coeff: &mut DVector<f64>,
        chem_pot: &mut DVector<f64>,
    ) -> PhaseResult<()>;

    /// Recompute d(ln activityCoeff_i)/d(moleNumber_j) for the phase's
    /// member species and scatter the block into the global Jacobian `jac`.
    ///
    /// The model owns its full block: every (i, j) pair of member species is
    /// overwritten, so stale entries from a previous composition cannot
    /// survive.
    fn ln_act_coeff_jacobian(
        &self,
        phase: &Phase,
        mole_numbers: &DVector<f64>,
        jac: &mut DMatrix<f64>,
    ) -> PhaseResult<()>;
}
