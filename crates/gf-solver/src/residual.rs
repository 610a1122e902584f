//! Free-energy residual of one formation reaction.

use gf_core::ensure_finite;
use gf_phases::ActivityModel;
use nalgebra::DVector;

use crate::error::{SolverError, SolverResult};
use crate::state::EquilState;

/// Recompute the driving force of reaction `irxn` at an arbitrary trial
/// composition.
///
/// Chemical potentials are re-evaluated only for the phases the reaction
/// participates in; the residual is the defining species' potential plus the
/// stoichiometric-weighted sum over the components. Pure function of its
/// inputs: persistent state is read-only and only the caller-provided
/// scratch buffers are written.
pub fn recalc_delta_g(
    state: &EquilState,
    irxn: usize,
    mole_numbers: &DVector<f64>,
    act_coeff: &mut DVector<f64>,
    chem_pot: &mut DVector<f64>,
) -> SolverResult<f64> {
    let kspec = state.kspec(irxn);
    for (ip, phase) in state.phases().iter().enumerate() {
        if state.participates(irxn, ip) {
            phase
                .model()
                .chem_potentials(phase, mole_numbers, act_coeff, chem_pot)?;
        }
    }
    let mut delta_g = chem_pot[kspec];
    for j in 0..state.num_components() {
        delta_g += state.stoich(irxn, j) * chem_pot[j];
    }
    ensure_finite(delta_g, "reaction deltaG").map_err(|_| SolverError::Numeric {
        what: format!("non-finite deltaG for reaction {irxn}"),
    })
}
