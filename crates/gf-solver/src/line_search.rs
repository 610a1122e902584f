//! Rough line search on one reaction's free-energy residual.

use crate::diag::{LineSearchNote, StepDiagnostics};
use crate::error::SolverResult;
use crate::residual::recalc_delta_g;
use crate::state::{EquilState, Workspace};

/// Bisection iteration cap.
pub const MAX_BISECTIONS: usize = 10;

/// Residual of reaction `irxn` with the proposed extent `dx` applied to the
/// defining species and, stoichiometry-scaled, to every component.
fn eval_residual(
    state: &EquilState,
    irxn: usize,
    kspec: usize,
    dx: f64,
    ws: &mut Workspace,
) -> SolverResult<f64> {
    ws.mol_trial.copy_from(&state.mole_numbers);
    ws.mol_trial[kspec] += dx;
    for j in 0..state.num_components() {
        ws.mol_trial[j] = state.mole_numbers[j] + state.stoich(irxn, j) * dx;
    }
    recalc_delta_g(
        state,
        irxn,
        &ws.mol_trial,
        &mut ws.act_coeff,
        &mut ws.chem_pot,
    )
}

/// Find a step length along `dx_orig` that does not overshoot past a sign
/// change of the reaction's driving force.
///
/// The full step is accepted when the residual keeps its sign. When the
/// residual flips but has shrunk below 80% of its starting magnitude, one
/// secant extrapolation lands near the root. Otherwise the step is halved up
/// to [`MAX_BISECTIONS`] times, accepting as soon as the sign recovers or
/// the residual dips under a linearly-tightening threshold. Exhausting the
/// cap is reported through the sink, and the last halved step is still
/// returned: the outer iteration tolerates an imperfect step.
///
/// A proposed step pointing *against* the driving force (dG and dx of the
/// same sign) is refused outright and zero is returned.
pub fn line_search(
    state: &EquilState,
    irxn: usize,
    dx_orig: f64,
    ws: &mut Workspace,
    diag: &dyn StepDiagnostics,
) -> SolverResult<f64> {
    let kspec = state.kspec(irxn);

    let delta_g_orig = eval_residual(state, irxn, kspec, 0.0, ws)?;
    let forig = delta_g_orig.abs() + 1.0e-15;

    if delta_g_orig > 0.0 {
        if dx_orig > 0.0 {
            diag.line_search(irxn, dx_orig, 0.0, &LineSearchNote::WrongDirection);
            return Ok(0.0);
        }
    } else if delta_g_orig < 0.0 {
        if dx_orig < 0.0 {
            diag.line_search(irxn, dx_orig, 0.0, &LineSearchNote::WrongDirection);
            return Ok(0.0);
        }
    } else {
        return Ok(0.0);
    }
    if dx_orig == 0.0 {
        return Ok(0.0);
    }

    let delta_g1 = eval_residual(state, irxn, kspec, dx_orig, ws)?;

    // No sign switch over the full distance: we are heading the right way,
    // accept the full step.
    if delta_g1 * delta_g_orig > 0.0 {
        diag.line_search(irxn, dx_orig, dx_orig, &LineSearchNote::FullStep);
        return Ok(dx_orig);
    }

    // Decreased enough that a secant estimate lands near the sign change.
    if delta_g1.abs() < 0.8 * forig {
        let dx = if delta_g1 * delta_g_orig < 0.0 {
            let slope = (delta_g1 - delta_g_orig) / dx_orig;
            -delta_g_orig / slope
        } else {
            dx_orig
        };
        diag.line_search(irxn, dx_orig, dx, &LineSearchNote::Secant);
        return Ok(dx);
    }

    let mut dx = dx_orig;
    for _ in 0..MAX_BISECTIONS {
        dx *= 0.5;
        let delta_g = eval_residual(state, irxn, kspec, dx, ws)?;
        if delta_g * delta_g_orig > 0.0 {
            diag.line_search(irxn, dx_orig, dx, &LineSearchNote::Bisected);
            return Ok(dx);
        }
        if delta_g.abs() / forig < 1.0 - 0.1 * dx / dx_orig {
            if delta_g * delta_g_orig < 0.0 {
                let slope = (delta_g - delta_g_orig) / dx;
                dx = -delta_g_orig / slope;
            }
            diag.line_search(irxn, dx_orig, dx, &LineSearchNote::Bisected);
            return Ok(dx);
        }
    }

    diag.line_search(irxn, dx_orig, dx, &LineSearchNote::CapExhausted);
    Ok(dx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gf_core::SpeciesId;
    use gf_phases::{ActivityModel, Phase, PhaseResult};
    use nalgebra::{DMatrix, DVector};
    use proptest::prelude::*;

    /// Potentials linear in mole numbers: mu_k = offset_k + coef_k * n_k.
    /// Keeps the residual an exactly linear function of the step, so secant
    /// arithmetic can be checked by hand.
    struct LinearPotential {
        offset: Vec<f64>,
        coef: Vec<f64>,
    }

    impl ActivityModel for LinearPotential {
        fn name(&self) -> &str {
            "linear-potential"
        }

        fn chem_potentials(
            &self,
            phase: &Phase,
            mole_numbers: &DVector<f64>,
            act_coeff: &mut DVector<f64>,
            chem_pot: &mut DVector<f64>,
        ) -> PhaseResult<()> {
            for s in phase.species() {
                let k = s.index();
                act_coeff[k] = 1.0;
                chem_pot[k] = self.offset[k] + self.coef[k] * mole_numbers[k];
            }
            Ok(())
        }

        fn ln_act_coeff_jacobian(
            &self,
            _phase: &Phase,
            _mole_numbers: &DVector<f64>,
            _jac: &mut DMatrix<f64>,
        ) -> PhaseResult<()> {
            Ok(())
        }
    }

    /// comp0 + spec1 in one phase, sc = [-1]. With the linear potentials the
    /// residual is dG(dx) = dG(0) + (coef0 + coef1) * dx.
    fn linear_state(offset: Vec<f64>, coef: Vec<f64>, moles: Vec<f64>) -> EquilState {
        let gas = Phase::mixture(
            "gas",
            vec![SpeciesId::from_index(0), SpeciesId::from_index(1)],
            Box::new(LinearPotential { offset, coef }),
        )
        .unwrap();
        EquilState::new(
            vec![gas],
            1,
            DVector::from_vec(moles),
            DMatrix::from_row_slice(1, 1, &[-1.0]),
            DVector::from_vec(vec![0.0]),
            1e-8,
        )
        .unwrap()
    }

    /// dG(0) = -2, dG(1) = 1.5: sign flip within the 0.8 threshold, so a
    /// single secant step dx = 2/3.5 is accepted.
    fn secant_scenario() -> EquilState {
        linear_state(
            vec![0.0, 0.0],
            vec![1.5, 2.0],
            vec![4.0 / 1.5, 1.0],
        )
    }

    #[test]
    fn secant_step_by_hand() {
        let st = secant_scenario();
        let mut ws = Workspace::for_state(&st);
        let dx = line_search(&st, 0, 1.0, &mut ws, &crate::diag::NoDiagnostics).unwrap();
        assert!((dx - 4.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn accepted_step_is_idempotent() {
        let st = secant_scenario();
        let mut ws = Workspace::for_state(&st);
        let dx1 = line_search(&st, 0, 1.0, &mut ws, &crate::diag::NoDiagnostics).unwrap();
        let dx2 = line_search(&st, 0, dx1, &mut ws, &crate::diag::NoDiagnostics).unwrap();
        assert_eq!(dx1, dx2);
    }

    #[test]
    fn wrong_direction_is_refused() {
        // dG(0) = -2 wants dx > 0; a negative proposal gets zeroed.
        let st = secant_scenario();
        let mut ws = Workspace::for_state(&st);
        let dx = line_search(&st, 0, -1.0, &mut ws, &crate::diag::NoDiagnostics).unwrap();
        assert_eq!(dx, 0.0);
    }

    #[test]
    fn zero_proposal_returns_zero() {
        let st = secant_scenario();
        let mut ws = Workspace::for_state(&st);
        let dx = line_search(&st, 0, 0.0, &mut ws, &crate::diag::NoDiagnostics).unwrap();
        assert_eq!(dx, 0.0);
    }

    #[test]
    fn full_step_accepted_when_sign_holds() {
        // dG(dx) = -2 + 0.2 dx keeps its sign across the whole unit step.
        let st = linear_state(vec![0.0, -2.0], vec![0.1, 0.1], vec![1.0, 1.0]);
        let mut ws = Workspace::for_state(&st);
        let dg0 = eval_residual(&st, 0, 1, 0.0, &mut ws).unwrap();
        assert!((dg0 - (-2.0)).abs() < 1e-12);
        let dx = line_search(&st, 0, 1.0, &mut ws, &crate::diag::NoDiagnostics).unwrap();
        assert_eq!(dx, 1.0);
    }

    #[test]
    fn overshoot_gets_bisected() {
        // dG(dx) = -2 + 400 dx: the full step overshoots massively and the
        // 0.8 criterion fails, so the step is halved until the residual
        // dips under the tightening threshold (7th halving, dx = 2^-7),
        // where the secant correction lands on the exact root 0.005.
        let st = linear_state(vec![0.0, 0.0], vec![200.0, 200.0], vec![1.0, 0.99]);
        let mut ws = Workspace::for_state(&st);
        let dg0 = eval_residual(&st, 0, 1, 0.0, &mut ws).unwrap();
        assert!((dg0 - (-2.0)).abs() < 1e-12);
        let dx = line_search(&st, 0, 1.0, &mut ws, &crate::diag::NoDiagnostics).unwrap();
        assert!((dx - 0.005).abs() < 1e-12);
        // Sign safety: the residual at the accepted step does not flip.
        let dg_at = eval_residual(&st, 0, 1, dx, &mut ws).unwrap();
        assert!(dg_at * dg0 >= 0.0);
    }

    proptest! {
        /// The residual at the returned step never strictly opposes the
        /// residual at zero (unless the returned step is exactly zero).
        #[test]
        fn sign_safety(
            slope0 in 0.05_f64..20.0,
            slope1 in 0.05_f64..20.0,
            offset in -4.0_f64..-0.1,
            dx_orig in 0.01_f64..2.0,
        ) {
            // dG(0) = offset < 0, so positive proposals are legal.
            let st = linear_state(
                vec![0.0, offset],
                vec![slope0, slope1],
                vec![1.0, 1.0],
            );
            let mut ws = Workspace::for_state(&st);
            let dg0 = eval_residual(&st, 0, 1, 0.0, &mut ws).unwrap();
            // Keep the starting residual clearly negative so the bisection
            // cap stays out of reach of these slope/step ranges.
            prop_assume!(dg0 <= -0.1);
            let dx = line_search(&st, 0, dx_orig, &mut ws, &crate::diag::NoDiagnostics).unwrap();
            if dx != 0.0 {
                let dg_at = eval_residual(&st, 0, 1, dx, &mut ws).unwrap();
                // A tiny overshoot past the root is tolerated only through
                // the secant branches, which by construction stop at the
                // root of the linear model: allow exact zero.
                prop_assert!(dg_at * dg0 >= -1e-9 * dg0.abs());
            }
        }
    }
}
