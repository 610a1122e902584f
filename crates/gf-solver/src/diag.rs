//! Injectable diagnostics for the step core.
//!
//! The core reports what it decided about every reaction it touched; whether
//! anyone listens is the sink's business. The default sink does nothing, so
//! diagnostic cost in the hot path is a virtual call per reaction.

/// What the adjustment pass did with one reaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReactionNote {
    /// Regular Newton treatment.
    Normal,
    /// Zeroed multi-species phase pulled back alive.
    PhaseBirth { dg: f64 },
    /// Zeroed multi-species phase staying dead.
    PhaseDead { dg: f64 },
    /// Driving force already inside the convergence tolerance.
    SkippedConverged { dg: f64 },
    /// Minor or nonexistent species already decreasing on its own.
    SkippedDecreasing { dg: f64 },
}

/// How the line search settled on its step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearchNote {
    /// Full proposed step accepted.
    FullStep,
    /// Secant-extrapolated step accepted.
    Secant,
    /// Step halved until the residual stopped overshooting.
    Bisected,
    /// Proposed step points against the driving force; reduced to zero.
    WrongDirection,
    /// Bisection cap exhausted; last halved step returned as-is.
    CapExhausted,
}

/// Diagnostic sink the step core reports into.
///
/// All methods default to no-ops, so an implementation only overrides what
/// it cares about.
pub trait StepDiagnostics {
    /// One event per processed reaction in the adjustment pass.
    fn reaction(
        &self,
        _irxn: usize,
        _kspec: usize,
        _moles: f64,
        _adjustment: f64,
        _note: &ReactionNote,
    ) {
    }

    /// The degenerate-curvature elimination fired and zeroed a species.
    fn elimination(&self, _irxn: usize, _zeroed: usize, _step: f64) {}

    /// Line-search outcome for one reaction.
    fn line_search(&self, _irxn: usize, _dx_orig: f64, _dx: f64, _note: &LineSearchNote) {}
}

/// The no-op sink.
pub struct NoDiagnostics;

impl StepDiagnostics for NoDiagnostics {}

/// Sink forwarding every event to `tracing` at debug level.
pub struct TracingDiagnostics;

impl StepDiagnostics for TracingDiagnostics {
    fn reaction(&self, irxn: usize, kspec: usize, moles: f64, adjustment: f64, note: &ReactionNote) {
        tracing::debug!(irxn, kspec, moles, adjustment, ?note, "reaction adjustment");
    }

    fn elimination(&self, irxn: usize, zeroed: usize, step: f64) {
        tracing::debug!(irxn, zeroed, step, "zeroed species, basis must be recomputed");
    }

    fn line_search(&self, irxn: usize, dx_orig: f64, dx: f64, note: &LineSearchNote) {
        tracing::debug!(irxn, dx_orig, dx, ?note, "line search");
    }
}
