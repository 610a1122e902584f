//! Shared iteration state for the step core.

use gf_core::{PhaseId, SpeciesId};
use gf_phases::{Phase, SpeciesStatus};
use nalgebra::{DMatrix, DVector};

use crate::error::{SolverError, SolverResult};

/// Mutable shared state of one equilibrium iteration.
///
/// Owns every array the correction step reads or writes: mole numbers,
/// per-phase totals, stoichiometry, driving forces, the adjustment vector,
/// species statuses, and the activity-coefficient Jacobian. The enclosing
/// iteration owns an `EquilState` for its whole lifetime; the step core
/// borrows it per call and never allocates or frees any of it.
///
/// Species are indexed `0..num_species`; the first `num_components` indices
/// form the current basis. Reaction `irxn` is the formation reaction of
/// species `num_components + irxn`.
#[derive(Debug)]
pub struct EquilState {
    num_components: usize,
    pub(crate) phases: Vec<Phase>,

    // reaction -> defining species and species -> phase lookup tables
    rxn_species: Vec<SpeciesId>,
    species_phase: Vec<PhaseId>,
    ss_phase: Vec<bool>,

    // per-reaction structure derived from the stoichiometry at construction
    stoich: DMatrix<f64>,
    dn_phase: DMatrix<f64>,
    phase_participation: Vec<Vec<bool>>,

    /// Species mole numbers.
    pub mole_numbers: DVector<f64>,
    /// Total moles per phase.
    pub tp_moles: DVector<f64>,
    /// Driving force (deltaG/RT) per reaction.
    pub dg: DVector<f64>,
    /// Proposed mole-number adjustment per species.
    pub ds: DVector<f64>,
    /// Per-reaction status of the defining species.
    pub status: Vec<SpeciesStatus>,
    /// Count of minor or zeroed reactions.
    pub num_rxn_minor_zeroed: usize,
    /// Global d(ln actCoeff_i)/d(moleNumber_j) Jacobian.
    pub act_coeff_jac: DMatrix<f64>,
    /// Superconvergence tolerance on |dg|.
    pub tol_major: f64,
}

impl EquilState {
    /// Build and validate the iteration state.
    ///
    /// `stoich` is `num_rxn x num_components`; row `irxn` holds the moles of
    /// each component produced per unit extent of reaction `irxn`. Phase
    /// totals, phase participation, per-phase mole sensitivities and species
    /// statuses are derived here, so they start consistent with the mole
    /// numbers by construction.
    pub fn new(
        phases: Vec<Phase>,
        num_components: usize,
        mole_numbers: DVector<f64>,
        stoich: DMatrix<f64>,
        dg: DVector<f64>,
        tol_major: f64,
    ) -> SolverResult<Self> {
        let num_species = mole_numbers.len();
        if num_components == 0 || num_components >= num_species {
            return Err(SolverError::State {
                what: format!(
                    "need 0 < num_components < num_species, got {num_components} of {num_species}"
                ),
            });
        }
        let num_rxn = num_species - num_components;
        if stoich.nrows() != num_rxn || stoich.ncols() != num_components {
            return Err(SolverError::State {
                what: format!(
                    "stoichiometry must be {num_rxn}x{num_components}, got {}x{}",
                    stoich.nrows(),
                    stoich.ncols()
                ),
            });
        }
        if dg.len() != num_rxn {
            return Err(SolverError::State {
                what: format!("driving-force vector must have length {num_rxn}"),
            });
        }
        for k in 0..num_species {
            if !mole_numbers[k].is_finite() || mole_numbers[k] < 0.0 {
                return Err(SolverError::State {
                    what: format!("mole number of species {k} must be finite and non-negative"),
                });
            }
        }

        // Each species belongs to exactly one phase.
        let mut membership: Vec<Option<PhaseId>> = vec![None; num_species];
        for (ip, phase) in phases.iter().enumerate() {
            for s in phase.species() {
                let k = s.index();
                if k >= num_species {
                    return Err(SolverError::State {
                        what: format!("phase '{}' references species {k} out of range", phase.name()),
                    });
                }
                if membership[k].is_some() {
                    return Err(SolverError::State {
                        what: format!("species {k} belongs to more than one phase"),
                    });
                }
                membership[k] = Some(PhaseId::from_index(ip));
            }
        }
        let mut species_phase = Vec::with_capacity(num_species);
        for (k, m) in membership.into_iter().enumerate() {
            species_phase.push(m.ok_or_else(|| SolverError::State {
                what: format!("species {k} belongs to no phase"),
            })?);
        }

        let ss_phase: Vec<bool> = (0..num_species)
            .map(|k| phases[species_phase[k].index()].single_species())
            .collect();

        let num_phases = phases.len();
        let mut tp_moles = DVector::zeros(num_phases);
        for (ip, phase) in phases.iter().enumerate() {
            tp_moles[ip] = phase.species().iter().map(|s| mole_numbers[s.index()]).sum();
        }

        let rxn_species: Vec<SpeciesId> = (0..num_rxn)
            .map(|irxn| SpeciesId::from_index(num_components + irxn))
            .collect();

        // dn_phase[irxn][ip]: change of phase ip's total moles per unit
        // reaction extent; participation marks every phase the reaction
        // touches, even when the net sensitivity cancels to zero.
        let mut dn_phase = DMatrix::zeros(num_rxn, num_phases);
        let mut phase_participation = vec![vec![false; num_phases]; num_rxn];
        for irxn in 0..num_rxn {
            let kph = species_phase[num_components + irxn].index();
            dn_phase[(irxn, kph)] += 1.0;
            phase_participation[irxn][kph] = true;
            for j in 0..num_components {
                let sc = stoich[(irxn, j)];
                if sc != 0.0 {
                    let jph = species_phase[j].index();
                    dn_phase[(irxn, jph)] += sc;
                    phase_participation[irxn][jph] = true;
                }
            }
        }

        let status: Vec<SpeciesStatus> = (0..num_rxn)
            .map(|irxn| {
                let k = num_components + irxn;
                if mole_numbers[k] == 0.0 {
                    if ss_phase[k] {
                        SpeciesStatus::ZeroedSingleSpecies
                    } else {
                        SpeciesStatus::ZeroedMultiSpecies
                    }
                } else {
                    SpeciesStatus::Major
                }
            })
            .collect();
        let num_rxn_minor_zeroed = status.iter().filter(|s| s.is_minor_or_zeroed()).count();

        Ok(Self {
            num_components,
            phases,
            rxn_species,
            species_phase,
            ss_phase,
            stoich,
            dn_phase,
            phase_participation,
            ds: DVector::zeros(num_species),
            act_coeff_jac: DMatrix::zeros(num_species, num_species),
            mole_numbers,
            tp_moles,
            dg,
            status,
            num_rxn_minor_zeroed,
            tol_major,
        })
    }

    pub fn num_species(&self) -> usize {
        self.mole_numbers.len()
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }

    pub fn num_rxn(&self) -> usize {
        self.rxn_species.len()
    }

    pub fn num_phases(&self) -> usize {
        self.phases.len()
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Defining species of reaction `irxn`.
    pub fn kspec(&self, irxn: usize) -> usize {
        self.rxn_species[irxn].index()
    }

    /// Phase index of species `k`.
    pub fn phase_of(&self, k: usize) -> usize {
        self.species_phase[k].index()
    }

    /// Whether species `k` lives in a single-species phase.
    pub fn is_single_species(&self, k: usize) -> bool {
        self.ss_phase[k]
    }

    /// Stoichiometric coefficient of component `j` in reaction `irxn`.
    pub fn stoich(&self, irxn: usize, j: usize) -> f64 {
        self.stoich[(irxn, j)]
    }

    /// Change of phase `ip`'s total moles per unit extent of reaction `irxn`.
    pub fn dn_phase(&self, irxn: usize, ip: usize) -> f64 {
        self.dn_phase[(irxn, ip)]
    }

    /// Whether reaction `irxn` touches any species of phase `ip`.
    pub fn participates(&self, irxn: usize, ip: usize) -> bool {
        self.phase_participation[irxn][ip]
    }

    /// Split borrow for the Jacobian assembler: the phase list read-only,
    /// the global Jacobian writable.
    pub(crate) fn phases_and_jacobian_mut(&mut self) -> (&[Phase], &mut DMatrix<f64>) {
        (&self.phases, &mut self.act_coeff_jac)
    }

    /// Override the status of one reaction's defining species, keeping the
    /// minor/zeroed count in sync.
    pub fn set_status(&mut self, irxn: usize, status: SpeciesStatus) {
        self.status[irxn] = status;
        self.num_rxn_minor_zeroed = self
            .status
            .iter()
            .filter(|s| s.is_minor_or_zeroed())
            .count();
    }
}

/// Scratch buffers for residual evaluation and the line search.
///
/// Sized once per state; reused across calls so the hot path never
/// allocates.
pub struct Workspace {
    /// Trial mole-number vector.
    pub mol_trial: DVector<f64>,
    /// Activity coefficients at the trial composition.
    pub act_coeff: DVector<f64>,
    /// RT-normalized chemical potentials at the trial composition.
    pub chem_pot: DVector<f64>,
}

impl Workspace {
    pub fn for_state(state: &EquilState) -> Self {
        let n = state.num_species();
        Self {
            mol_trial: DVector::zeros(n),
            act_coeff: DVector::zeros(n),
            chem_pot: DVector::zeros(n),
        }
    }
}
