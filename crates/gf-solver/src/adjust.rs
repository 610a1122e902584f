//! Per-iteration reaction adjustments.

use gf_core::SpeciesId;
use gf_phases::SpeciesStatus;

use crate::diag::{ReactionNote, StepDiagnostics};
use crate::state::EquilState;

/// Driving force below which a zeroed multi-species phase is seeded back to
/// life.
pub const PHASE_BIRTH_THRESHOLD: f64 = -1.0e-4;
/// Seed moles handed to a species whose phase is coming alive.
pub const PHASE_BIRTH_SEED: f64 = 1.0e-10;
/// Starting ratio when no limiting component exists on the negative side.
const RATIO_SENTINEL: f64 = 1.0e10;

/// Outcome of one adjustment pass.
///
/// Any variant other than `Intact` means the degenerate-curvature
/// elimination drove a species to exactly zero moles: the component basis is
/// stale and the caller must recompute it before touching the reactions
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisChange {
    /// Full pass completed; basis still valid.
    Intact,
    /// A non-component species was zeroed out.
    ZeroedNonComponent { species: SpeciesId },
    /// A component species was zeroed out.
    ZeroedComponent { species: SpeciesId },
}

impl BasisChange {
    pub fn basis_invalidated(self) -> bool {
        !matches!(self, BasisChange::Intact)
    }
}

/// Ideal-solution diagonal curvature of one reaction.
///
/// `1/n` for the defining species (unless its phase is single-species), plus
/// `sc^2/n` over components outside single-species phases, minus the
/// phase-total terms `dnPhase^2 / tpMoles` over live multi-species phases.
/// Exactly zero means the reaction acts entirely among single-species
/// phases. Feed the result to [`crate::hessian::hessian_diag_adjusted`] when
/// a non-ideal correction is wanted.
pub fn diagonal_curvature(state: &EquilState, irxn: usize) -> f64 {
    let kspec = state.kspec(irxn);
    let mut s = if state.is_single_species(kspec) {
        0.0
    } else {
        1.0 / state.mole_numbers[kspec]
    };
    for j in 0..state.num_components() {
        if !state.is_single_species(j) {
            s += state.stoich(irxn, j).powi(2) / state.mole_numbers[j];
        }
    }
    for ip in 0..state.num_phases() {
        if !state.phases()[ip].single_species() && state.tp_moles[ip] > 0.0 {
            s -= state.dn_phase(irxn, ip).powi(2) / state.tp_moles[ip];
        }
    }
    s
}

/// Compute a mole-number adjustment for every active formation reaction.
///
/// Each reaction is either skipped, assigned a one-dimensional Newton step
/// from the diagonal curvature estimate, or -- when the curvature vanishes
/// because the reaction acts entirely among single-species phases --
/// resolved by an exact ratio-test elimination that zeroes one species and
/// ends the pass immediately.
///
/// The steepest-descent direction is never violated: a minor or nonexistent
/// species whose driving force already says "decrease" is left alone, and a
/// dead multi-species phase is only seeded when its driving force clearly
/// wants it alive.
pub fn reaction_adjustments(state: &mut EquilState, diag: &dyn StepDiagnostics) -> BasisChange {
    for irxn in 0..state.num_rxn() {
        let kspec = state.kspec(irxn);
        let dg = state.dg[irxn];

        if state.mole_numbers[kspec] == 0.0 && !state.is_single_species(kspec) {
            // Multi-species phase currently holding zero moles: activation
            // test instead of a Newton step.
            if dg < PHASE_BIRTH_THRESHOLD {
                state.ds[kspec] = PHASE_BIRTH_SEED;
                state.status[irxn] = SpeciesStatus::Major;
                state.num_rxn_minor_zeroed = state.num_rxn_minor_zeroed.saturating_sub(1);
                diag.reaction(irxn, kspec, 0.0, PHASE_BIRTH_SEED, &ReactionNote::PhaseBirth { dg });
            } else {
                state.ds[kspec] = 0.0;
                diag.reaction(irxn, kspec, 0.0, 0.0, &ReactionNote::PhaseDead { dg });
            }
            continue;
        }

        // Superconvergence already achieved in this mode: leave ds alone.
        if dg.abs() <= state.tol_major {
            diag.reaction(
                irxn,
                kspec,
                state.mole_numbers[kspec],
                state.ds[kspec],
                &ReactionNote::SkippedConverged { dg },
            );
            continue;
        }
        // Minor or nonexistent species already decreasing on its own.
        if state.status[irxn].is_minor_or_zeroed() && dg >= 0.0 {
            diag.reaction(
                irxn,
                kspec,
                state.mole_numbers[kspec],
                state.ds[kspec],
                &ReactionNote::SkippedDecreasing { dg },
            );
            continue;
        }

        let s = diagonal_curvature(state, irxn);
        if s != 0.0 {
            state.ds[kspec] = -dg / s;
            diag.reaction(
                irxn,
                kspec,
                state.mole_numbers[kspec],
                state.ds[kspec],
                &ReactionNote::Normal,
            );
        } else if let Some(change) = eliminate_among_single_species(state, irxn, kspec, diag) {
            // The basis was just invalidated; remaining reactions cannot be
            // trusted until it is recomputed.
            return change;
        }
    }
    BasisChange::Intact
}

/// Resolve a reaction acting entirely among single-species phases.
///
/// Either the defining species or one of the component phases hits zero
/// first; the sign of the driving force picks the direction, a ratio test
/// picks the loser. Mole numbers and phase totals are walked by the exact
/// extent and the limiting species is forced to exactly zero.
fn eliminate_among_single_species(
    state: &mut EquilState,
    irxn: usize,
    kspec: usize,
    diag: &dyn StepDiagnostics,
) -> Option<BasisChange> {
    let dg = state.dg[irxn];
    let mut dss;
    let mut limiting;
    if dg > 0.0 {
        dss = state.mole_numbers[kspec];
        limiting = kspec;
        for j in 0..state.num_components() {
            let sc = state.stoich(irxn, j);
            if sc > 0.0 {
                let ratio = state.mole_numbers[j] / sc;
                if ratio < dss {
                    dss = ratio;
                    limiting = j;
                }
            }
        }
        dss = -dss;
    } else {
        dss = RATIO_SENTINEL;
        limiting = 0;
        for j in 0..state.num_components() {
            let sc = state.stoich(irxn, j);
            if sc < 0.0 {
                let ratio = -state.mole_numbers[j] / sc;
                if ratio < dss {
                    dss = ratio;
                    limiting = j;
                }
            }
        }
    }
    if dss == 0.0 {
        return None;
    }

    state.mole_numbers[kspec] += dss;
    let kph = state.phase_of(kspec);
    state.tp_moles[kph] += dss;
    for j in 0..state.num_components() {
        let sc = state.stoich(irxn, j);
        state.mole_numbers[j] += dss * sc;
        let jph = state.phase_of(j);
        state.tp_moles[jph] += dss * sc;
    }
    let lph = state.phase_of(limiting);
    state.mole_numbers[limiting] = 0.0;
    state.tp_moles[lph] = 0.0;

    diag.elimination(irxn, limiting, dss);

    Some(if limiting == kspec {
        BasisChange::ZeroedNonComponent {
            species: SpeciesId::from_index(limiting),
        }
    } else {
        BasisChange::ZeroedComponent {
            species: SpeciesId::from_index(limiting),
        }
    })
}
