//! End-to-end scenarios for the correction step: Jacobian assembly, Hessian
//! diagonal, reaction adjustments, and line search driving one realistic
//! multi-phase system.

use gf_core::SpeciesId;
use gf_phases::{IdealSolution, MargulesBinary, Phase};
use gf_solver::{
    BasisChange, EquilState, NoDiagnostics, Workspace, act_coeff_curvature, diagonal_curvature,
    hessian_diag_adjusted, line_search, reaction_adjustments, recalc_delta_g,
    update_act_coeff_jacobian,
};
use nalgebra::{DMatrix, DVector};

/// Gas mixture A + B + AB with a pure condensed A2 on the side.
///
/// Species: 0 = A(g), 1 = B(g) (components), 2 = AB(g), 3 = A2(s).
/// Reactions: AB <-> A + B (sc = [-1, -1]), A2 <-> 2 A (sc = [-2, 0]).
fn gas_plus_solid() -> EquilState {
    let mu0 = DVector::from_vec(vec![-1.0, -1.5, -4.0, -3.5]);
    let gas = Phase::mixture(
        "gas",
        vec![
            SpeciesId::from_index(0),
            SpeciesId::from_index(1),
            SpeciesId::from_index(2),
        ],
        Box::new(IdealSolution::new(mu0.clone())),
    )
    .unwrap();
    let solid = Phase::single(
        "A2(s)",
        SpeciesId::from_index(3),
        Box::new(IdealSolution::new(mu0)),
    );
    EquilState::new(
        vec![gas, solid],
        2,
        DVector::from_vec(vec![1.0, 1.0, 0.5, 0.25]),
        DMatrix::from_row_slice(2, 2, &[-1.0, -1.0, -2.0, 0.0]),
        DVector::zeros(2),
        1e-8,
    )
    .unwrap()
}

/// Fill `state.dg` from the residual evaluator at the current composition.
fn refresh_driving_forces(state: &mut EquilState, ws: &mut Workspace) {
    let n = state.mole_numbers.clone();
    for irxn in 0..state.num_rxn() {
        state.dg[irxn] =
            recalc_delta_g(state, irxn, &n, &mut ws.act_coeff, &mut ws.chem_pot).unwrap();
    }
}

#[test]
fn full_chain_on_ideal_system() {
    let mut st = gas_plus_solid();
    let mut ws = Workspace::for_state(&st);

    // Ideal models: the assembled Jacobian is zero, so the adjusted Hessian
    // diagonal equals the ideal curvature.
    let n = st.mole_numbers.clone();
    update_act_coeff_jacobian(&mut st, &n).unwrap();
    for irxn in 0..st.num_rxn() {
        let s = diagonal_curvature(&st, irxn);
        assert!(s > 0.0, "curvature of reaction {irxn} should be positive");
        assert_eq!(act_coeff_curvature(&st, irxn), 0.0);
        let adjusted = hessian_diag_adjusted(&st, irxn, s).unwrap();
        assert_eq!(adjusted, s);
    }

    refresh_driving_forces(&mut st, &mut ws);
    // AB is underrepresented at this composition (dg < 0), the condensed A2
    // slightly over (dg > 0).
    assert!(st.dg[0] < 0.0);
    assert!(st.dg[1] > 0.0);

    let change = reaction_adjustments(&mut st, &NoDiagnostics);
    assert_eq!(change, BasisChange::Intact);
    // Newton steps point against the driving forces.
    assert!(st.ds[2] > 0.0);
    assert!(st.ds[3] < 0.0);

    // Line search validates each proposed step: same direction, never a
    // sign flip at the accepted length.
    for irxn in 0..st.num_rxn() {
        let kspec = 2 + irxn;
        let proposed = st.ds[kspec];
        let dx = line_search(&st, irxn, proposed, &mut ws, &NoDiagnostics).unwrap();
        assert!(dx * proposed >= 0.0);
        assert!(dx.abs() <= proposed.abs());

        let mut trial = st.mole_numbers.clone();
        trial[kspec] += dx;
        for j in 0..st.num_components() {
            trial[j] += st.stoich(irxn, j) * dx;
        }
        let dg_at = recalc_delta_g(&st, irxn, &trial, &mut ws.act_coeff, &mut ws.chem_pot).unwrap();
        assert!(
            dg_at * st.dg[irxn] >= -1e-10,
            "line search overshot reaction {irxn}: {} vs {}",
            dg_at,
            st.dg[irxn]
        );
    }
}

/// Melt of two components under a Margules model, forming a pure solid.
///
/// Species: 0, 1 = melt components, 2 = solid reaction species,
/// sc = [-1, -1].
fn margules_melt_plus_solid() -> EquilState {
    let mu0 = DVector::from_vec(vec![-2.0, -2.5, -5.5]);
    let melt = Phase::mixture(
        "melt",
        vec![SpeciesId::from_index(0), SpeciesId::from_index(1)],
        Box::new(MargulesBinary::new(mu0.clone(), 1.1, 0.6)),
    )
    .unwrap();
    let solid = Phase::single(
        "solid",
        SpeciesId::from_index(2),
        Box::new(IdealSolution::new(mu0)),
    );
    EquilState::new(
        vec![melt, solid],
        2,
        DVector::from_vec(vec![0.5, 1.5, 0.75]),
        DMatrix::from_row_slice(1, 2, &[-1.0, -1.0]),
        DVector::zeros(1),
        1e-8,
    )
    .unwrap()
}

#[test]
fn non_ideal_correction_feeds_the_hessian() {
    let mut st = margules_melt_plus_solid();
    let mut ws = Workspace::for_state(&st);

    let n = st.mole_numbers.clone();
    update_act_coeff_jacobian(&mut st, &n).unwrap();

    let ideal = diagonal_curvature(&st, 0);
    assert!(ideal > 0.0);
    let correction = act_coeff_curvature(&st, 0);
    assert!(correction != 0.0, "Margules phase must contribute curvature");

    let adjusted = hessian_diag_adjusted(&st, 0, ideal).unwrap();
    assert!(adjusted > 0.0);
    // Reduction can never exceed two-thirds of the ideal diagonal.
    assert!(adjusted >= ideal * (1.0 - 0.6666) - 1e-14);

    refresh_driving_forces(&mut st, &mut ws);
    let change = reaction_adjustments(&mut st, &NoDiagnostics);
    assert_eq!(change, BasisChange::Intact);

    let proposed = st.ds[2];
    assert!(proposed != 0.0);
    let dx = line_search(&st, 0, proposed, &mut ws, &NoDiagnostics).unwrap();
    assert!(dx * proposed >= 0.0);
}

#[test]
fn elimination_aborts_the_pass() {
    // Four single-species phases; both reactions are degenerate, but the
    // first one zeroes a component and the pass must stop right there.
    let phases: Vec<Phase> = (0..4)
        .map(|k| {
            Phase::single(
                format!("s{k}"),
                SpeciesId::from_index(k),
                Box::new(IdealSolution::new(DVector::zeros(4))),
            )
        })
        .collect();
    let mut st = EquilState::new(
        phases,
        2,
        DVector::from_vec(vec![3.0, 4.0, 5.0, 6.0]),
        DMatrix::from_row_slice(2, 2, &[1.0, -1.0, 0.0, 1.0]),
        DVector::from_vec(vec![0.5, 0.5]),
        1e-8,
    )
    .unwrap();
    st.ds[3] = 0.123;

    let change = reaction_adjustments(&mut st, &NoDiagnostics);
    assert_eq!(
        change,
        BasisChange::ZeroedComponent {
            species: SpeciesId::from_index(0)
        }
    );
    assert_eq!(st.mole_numbers[0], 0.0);
    assert_eq!(st.tp_moles[0], 0.0);
    // Reaction 1 was never reached: its adjustment slot is untouched.
    assert_eq!(st.ds[3], 0.123);
}
