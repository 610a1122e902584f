//! Two-parameter Margules activity model for binary solution phases.

use nalgebra::{DMatrix, DVector};

use crate::error::{PhaseError, PhaseResult};
use crate::model::{ActivityModel, MOLE_FRACTION_FLOOR};
use crate::phase::Phase;

/// Binary Margules (regular-solution) model:
///
/// ```text
/// ln gamma_1 = x2^2 * [A12 + 2 (A21 - A12) x1]
/// ln gamma_2 = x1^2 * [A21 + 2 (A12 - A21) x2]
/// ```
///
/// with RT-normalized interaction parameters. The Jacobian of
/// ln(activity coefficient) with respect to mole numbers is analytic, so this
/// model exercises the non-ideal curvature correction of the step core with
/// exact derivatives.
pub struct MargulesBinary {
    mu0: DVector<f64>,
    a12: f64,
    a21: f64,
}

impl MargulesBinary {
    pub fn new(mu0: DVector<f64>, a12: f64, a21: f64) -> Self {
        Self { mu0, a12, a21 }
    }

    fn members(&self, phase: &Phase) -> PhaseResult<(usize, usize)> {
        if phase.species().len() != 2 || phase.single_species() {
            return Err(PhaseError::NotSupported {
                what: "Margules model requires a binary mixture phase",
            });
        }
        Ok((phase.species()[0].index(), phase.species()[1].index()))
    }

    fn fractions(&self, n1: f64, n2: f64) -> PhaseResult<(f64, f64, f64)> {
        let total = n1 + n2;
        if !(total > 0.0) {
            return Err(PhaseError::NonPhysical {
                what: "phase total moles must be positive",
            });
        }
        Ok((n1 / total, n2 / total, total))
    }

    fn ln_gammas(&self, x1: f64, x2: f64) -> (f64, f64) {
        let ln_g1 = x2 * x2 * (self.a12 + 2.0 * (self.a21 - self.a12) * x1);
        let ln_g2 = x1 * x1 * (self.a21 + 2.0 * (self.a12 - self.a21) * x2);
        (ln_g1, ln_g2)
    }
}

impl ActivityModel for MargulesBinary {
    fn name(&self) -> &str {
        "margules-binary"
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
        let (k1, k2) = self.members(phase)?;
        let (x1, x2, _) = self.fractions(mole_numbers[k1], mole_numbers[k2])?;
        let (ln_g1, ln_g2) = self.ln_gammas(x1, x2);

        act_coeff[k1] = ln_g1.exp();
        act_coeff[k2] = ln_g2.exp();
        chem_pot[k1] = self.mu0[k1] + x1.max(MOLE_FRACTION_FLOOR).ln() + ln_g1;
        chem_pot[k2] = self.mu0[k2] + x2.max(MOLE_FRACTION_FLOOR).ln() + ln_g2;
        Ok(())
    }

    fn ln_act_coeff_jacobian(
        &self,
        phase: &Phase,
        mole_numbers: &DVector<f64>,
        jac: &mut DMatrix<f64>,
    ) -> PhaseResult<()> {
        let (k1, k2) = self.members(phase)?;
        let (x1, x2, total) = self.fractions(mole_numbers[k1], mole_numbers[k2])?;

        // d(ln gamma_1)/dx1 with x2 = 1 - x1
        let dg1_dx1 =
            -2.0 * x2 * (self.a12 + 2.0 * (self.a21 - self.a12) * x1)
                + x2 * x2 * 2.0 * (self.a21 - self.a12);
        // d(ln gamma_2)/dx2 with x1 = 1 - x2
        let dg2_dx2 =
            -2.0 * x1 * (self.a21 + 2.0 * (self.a12 - self.a21) * x2)
                + x1 * x1 * 2.0 * (self.a12 - self.a21);

        // dx1/dn1 = x2/T, dx1/dn2 = -x1/T (and symmetrically for x2)
        jac[(k1, k1)] = dg1_dx1 * x2 / total;
        jac[(k1, k2)] = -dg1_dx1 * x1 / total;
        jac[(k2, k2)] = dg2_dx2 * x1 / total;
        jac[(k2, k1)] = -dg2_dx2 * x2 / total;
        Ok(())
    }
}
