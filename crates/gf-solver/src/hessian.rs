//! Diagonal Hessian estimate with activity-coefficient correction.

use crate::error::{SolverError, SolverResult};
use crate::state::EquilState;

/// Largest fraction of the ideal diagonal a negative activity-coefficient
/// correction may remove.
const DIAG_REDUCTION_LIMIT: f64 = 0.6666;

/// Adjust the ideal-solution diagonal curvature of one reaction for the
/// dependence of activity coefficients on mole numbers.
///
/// The diagonal may grow without bound, but a reduction is clamped to
/// two-thirds of the ideal value so the result stays strictly positive: a
/// zero or negative curvature would break the one-dimensional Newton step
/// built on it. A non-positive ideal diagonal is a logic error upstream and
/// is rejected outright.
pub fn hessian_diag_adjusted(
    state: &EquilState,
    irxn: usize,
    hessian_diag_ideal: f64,
) -> SolverResult<f64> {
    if hessian_diag_ideal <= 0.0 {
        return Err(SolverError::NonPositiveCurvature {
            irxn,
            value: hessian_diag_ideal,
        });
    }
    Ok(blend(hessian_diag_ideal, act_coeff_curvature(state, irxn)))
}

fn blend(ideal: f64, correction: f64) -> f64 {
    if correction >= 0.0 {
        ideal + correction
    } else if correction.abs() < DIAG_REDUCTION_LIMIT * ideal {
        ideal + correction
    } else {
        ideal - DIAG_REDUCTION_LIMIT * ideal
    }
}

/// Curvature contribution of non-ideal activity coefficients to one
/// reaction's diagonal Hessian entry.
///
/// Diagonal term of the Jacobian for the defining species, plus cross terms
/// over component pairs sharing a multi-species phase, plus the coupling of
/// the defining species with components of its own phase. The loops only run
/// over the components, so this stays cheap.
pub fn act_coeff_curvature(state: &EquilState, irxn: usize) -> f64 {
    let kspec = state.kspec(irxn);
    let kph = state.phase_of(kspec);
    let jac = &state.act_coeff_jac;

    let mut s = jac[(kspec, kspec)];
    for l in 0..state.num_components() {
        if state.is_single_species(l) {
            continue;
        }
        for k in 0..state.num_components() {
            if state.phase_of(k) == state.phase_of(l) {
                s += state.stoich(irxn, k) * state.stoich(irxn, l) * jac[(k, l)];
            }
        }
        if kph == state.phase_of(l) {
            s += state.stoich(irxn, l) * (jac[(kspec, l)] + jac[(l, kspec)]);
        }
    }
    s
}
