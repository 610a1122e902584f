//! Species lifecycle status.

/// Where a non-component species stands in the current iteration.
///
/// The adjustment pass treats major species with a full Newton step, refuses
/// to push minor or zeroed species further down, and runs a phase-activation
/// test on zeroed species in multi-species phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeciesStatus {
    /// Present in significant amount.
    Major,
    /// Present in trace amount.
    Minor,
    /// Zero moles, member of a multi-species phase (may come back alive).
    ZeroedMultiSpecies,
    /// Zero moles, sole species of a single-species phase.
    ZeroedSingleSpecies,
}

impl SpeciesStatus {
    /// Minor or nonexistent: anything short of major.
    pub fn is_minor_or_zeroed(self) -> bool {
        !matches!(self, SpeciesStatus::Major)
    }

    /// Species has zero moles.
    pub fn is_zeroed(self) -> bool {
        matches!(
            self,
            SpeciesStatus::ZeroedMultiSpecies | SpeciesStatus::ZeroedSingleSpecies
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_is_not_minor() {
        assert!(!SpeciesStatus::Major.is_minor_or_zeroed());
        assert!(SpeciesStatus::Minor.is_minor_or_zeroed());
        assert!(SpeciesStatus::ZeroedMultiSpecies.is_minor_or_zeroed());
        assert!(SpeciesStatus::ZeroedSingleSpecies.is_minor_or_zeroed());
    }

    #[test]
    fn zeroed_variants() {
        assert!(SpeciesStatus::ZeroedMultiSpecies.is_zeroed());
        assert!(SpeciesStatus::ZeroedSingleSpecies.is_zeroed());
        assert!(!SpeciesStatus::Minor.is_zeroed());
    }
}
