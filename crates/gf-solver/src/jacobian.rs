//! Assembly of the global activity-coefficient Jacobian.

use gf_phases::ActivityModel;
use nalgebra::DVector;

use crate::error::SolverResult;
use crate::state::EquilState;

/// Recompute d(ln actCoeff_i)/d(moleNumber_j) for every multi-species phase
/// at the given composition and scatter the per-phase blocks into the
/// state's global Jacobian.
///
/// Single-species phases are skipped: their activity coefficient has no
/// mole-number dependence to track. Each model overwrites its phase's whole
/// block, so entries never go stale across calls.
pub fn update_act_coeff_jacobian(
    state: &mut EquilState,
    mole_numbers: &DVector<f64>,
) -> SolverResult<()> {
    let (phases, act_coeff_jac) = state.phases_and_jacobian_mut();
    for phase in phases {
        if phase.single_species() {
            continue;
        }
        phase
            .model()
            .ln_act_coeff_jacobian(phase, mole_numbers, act_coeff_jac)?;
    }
    Ok(())
}
