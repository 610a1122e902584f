//! gf-phases: phase metadata and activity models for gibbsflow.
//!
//! Provides:
//! - Phase definitions (member species, single-species flag)
//! - Species lifecycle status (major / minor / zeroed)
//! - ActivityModel trait for chemical potentials and activity-coefficient
//!   derivatives
//! - Ideal-solution and binary Margules backends
//!
//! # Architecture
//!
//! This crate defines a stable API (`ActivityModel` trait) that isolates the
//! step core in `gf-solver` from how chemical potentials are actually
//! computed. The ideal-solution backend covers gas mixtures and pure
//! condensed phases; the Margules backend covers non-ideal binary solutions.
//! Equation-of-state backends can be added behind the same trait without
//! touching the solver.
//!
//! All chemical potentials are normalized by RT, so every quantity crossing
//! this API is dimensionless or a mole number.
//!
//! # Example
//!
//! ```
//! use gf_core::SpeciesId;
//! use gf_phases::{ActivityModel, IdealSolution, Phase};
//! use nalgebra::DVector;
//!
//! let mu0 = DVector::from_vec(vec![-1.0, -2.0]);
//! let gas = Phase::mixture(
//!     "gas",
//!     vec![SpeciesId::from_index(0), SpeciesId::from_index(1)],
//!     Box::new(IdealSolution::new(mu0)),
//! )
//! .unwrap();
//!
//! let n = DVector::from_vec(vec![1.0, 3.0]);
//! let mut ac = DVector::zeros(2);
//! let mut mu = DVector::zeros(2);
//! gas.model().chem_potentials(&gas, &n, &mut ac, &mut mu).unwrap();
//! assert!((mu[0] - (-1.0 + 0.25_f64.ln())).abs() < 1e-12);
//! ```

pub mod error;
pub mod ideal;
pub mod margules;
pub mod model;
pub mod phase;
pub mod status;

// Re-exports for ergonomics
pub use error::{PhaseError, PhaseResult};
pub use ideal::IdealSolution;
pub use margules::MargulesBinary;
pub use model::{ActivityModel, MOLE_FRACTION_FLOOR};
pub use phase::Phase;
pub use status::SpeciesStatus;
