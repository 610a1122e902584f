//! Phase definitions (member species and structure).

use core::fmt;

use gf_core::SpeciesId;

use crate::error::{PhaseError, PhaseResult};
use crate::model::ActivityModel;

/// One thermodynamic phase: its member species and its activity model.
///
/// A phase is structural metadata; the *amounts* (total phase moles) live in
/// the solver state and are updated there. A single-species phase is one
/// where, by construction, exactly one species can ever exist (e.g. a pure
/// condensed solid), so its activity has no composition dependence.
pub struct Phase {
    name: String,
    species: Vec<SpeciesId>,
    single_species: bool,
    model: Box<dyn ActivityModel>,
}

impl Phase {
    /// Create a single-species phase (pure condensed phase).
    pub fn single(
        name: impl Into<String>,
        species: SpeciesId,
        model: Box<dyn ActivityModel>,
    ) -> Self {
        Self {
            name: name.into(),
            species: vec![species],
            single_species: true,
            model,
        }
    }

    /// Create a multi-species (solution) phase.
    ///
    /// Requires at least two member species with no duplicates. A solution
    /// phase may still hold zero moles of some members at runtime; that is a
    /// state matter, not a structural one.
    pub fn mixture(
        name: impl Into<String>,
        species: Vec<SpeciesId>,
        model: Box<dyn ActivityModel>,
    ) -> PhaseResult<Self> {
        if species.len() < 2 {
            return Err(PhaseError::InvalidArg {
                what: "mixture phase needs at least two species",
            });
        }
        for (i, s) in species.iter().enumerate() {
            if species[..i].contains(s) {
                return Err(PhaseError::InvalidArg {
                    what: "duplicate species in phase",
                });
            }
        }
        Ok(Self {
            name: name.into(),
            species,
            single_species: false,
            model,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member species, in declaration order.
    pub fn species(&self) -> &[SpeciesId] {
        &self.species
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn single_species(&self) -> bool {
        self.single_species
    }

    pub fn contains(&self, species: SpeciesId) -> bool {
        self.species.contains(&species)
    }

    /// The activity model evaluating this phase's chemical potentials.
    pub fn model(&self) -> &dyn ActivityModel {
        self.model.as_ref()
    }
}

impl fmt::Debug for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Phase")
            .field("name", &self.name)
            .field("species", &self.species)
            .field("single_species", &self.single_species)
            .field("model", &self.model.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ideal::IdealSolution;
    use nalgebra::DVector;

    fn ideal(n: usize) -> Box<dyn ActivityModel> {
        Box::new(IdealSolution::new(DVector::zeros(n)))
    }

    #[test]
    fn single_phase_structure() {
        let p = Phase::single("graphite", SpeciesId::from_index(3), ideal(4));
        assert!(p.single_species());
        assert_eq!(p.len(), 1);
        assert!(p.contains(SpeciesId::from_index(3)));
        assert!(!p.contains(SpeciesId::from_index(0)));
    }

    #[test]
    fn mixture_needs_two_species() {
        let err = Phase::mixture("gas", vec![SpeciesId::from_index(0)], ideal(1)).unwrap_err();
        assert!(matches!(err, PhaseError::InvalidArg { .. }));
    }

    #[test]
    fn mixture_rejects_duplicates() {
        let s = SpeciesId::from_index(1);
        let err = Phase::mixture("gas", vec![s, s], ideal(2)).unwrap_err();
        assert!(matches!(err, PhaseError::InvalidArg { .. }));
    }

    #[test]
    fn debug_names_the_model() {
        let p = Phase::single("ice", SpeciesId::from_index(0), ideal(1));
        let dbg = format!("{p:?}");
        assert!(dbg.contains("ideal-solution"));
    }
}
