//! Ideal-solution activity model.

use nalgebra::{DMatrix, DVector};

use crate::error::{PhaseError, PhaseResult};
use crate::model::{ActivityModel, MOLE_FRACTION_FLOOR};
use crate::phase::Phase;

/// Ideal solution: unit activity coefficients everywhere.
///
/// For a multi-species phase, `mu_k = mu0_k + ln x_k`; for a single-species
/// phase, `mu_k = mu0_k`. The activity-coefficient Jacobian block is
/// identically zero. Standard-state potentials are RT-normalized and indexed
/// by global species index.
pub struct IdealSolution {
    mu0: DVector<f64>,
}

impl IdealSolution {
    pub fn new(mu0: DVector<f64>) -> Self {
        Self { mu0 }
    }

    /// Standard-state chemical potential (RT-normalized) of one species.
    pub fn mu0(&self, k: usize) -> f64 {
        self.mu0[k]
    }
}

impl ActivityModel for IdealSolution {
    fn name(&self) -> &str {
        "ideal-solution"
    }

    fn chem_potentials(
        &self,
        phase: &Phase,
        mole_numbers: &DVector<f64>,
        act_coeff: &mut DVector<f64>,
        chem_pot: &mut DVector<f64>,
    ) -> PhaseResult<()> {
        if mole_numbers.len() != self.mu0.len() {
            return Err(PhaseError::InvalidArg {
                what: "mole vector length does not match standard-state table",
            });
        }
        if phase.single_species() {
            let k = phase.species()[0].index();
            act_coeff[k] = 1.0;
            chem_pot[k] = self.mu0[k];
            return Ok(());
        }
        let total: f64 = phase
            .species()
            .iter()
            .map(|s| mole_numbers[s.index()])
            .sum();
        if !(total > 0.0) {
            return Err(PhaseError::NonPhysical {
                what: "phase total moles must be positive",
            });
        }
        for s in phase.species() {
            let k = s.index();
            let x = (mole_numbers[k] / total).max(MOLE_FRACTION_FLOOR);
            act_coeff[k] = 1.0;
            chem_pot[k] = self.mu0[k] + x.ln();
        }
        Ok(())
    }

    fn ln_act_coeff_jacobian(
        &self,
        phase: &Phase,
        _mole_numbers: &DVector<f64>,
        jac: &mut DMatrix<f64>,
    ) -> PhaseResult<()> {
        for si in phase.species() {
            for sj in phase.species() {
                jac[(si.index(), sj.index())] = 0.0;
            }
        }
        Ok(())
    }
}
