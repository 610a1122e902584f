use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier used across the equilibrium tables.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    pub fn from_index(index: usize) -> Self {
        let raw = u32::try_from(index + 1).expect("index+1 fits in u32");
        Self(NonZeroU32::new(raw).expect("index+1 is nonzero"))
    }

    /// Recover the 0-based index, ready for array access.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Domain-specific ID aliases for clarity (no runtime cost).
///
/// A `SpeciesId` below `num_components` names a basis (component) species;
/// every `RxnId` names the formation reaction of one non-component species.
pub type SpeciesId = Id;
pub type PhaseId = Id;
pub type RxnId = Id;
