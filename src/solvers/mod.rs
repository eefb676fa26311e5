// src/solvers/mod.rs
//! CPU Scheme Kernels
//!
//! Per-path numerical integrators. Each kernel advances a single path
//! from `t = 0` to the horizon, writing into a caller-provided slice of
//! length `N + 1` whose slot 0 receives the initial condition exactly.
//! The kernels are purely functional per path: no state beyond the step
//! index, no shared mutable data, one independent RNG per path.
//!
//! Every kernel comes in two variants, one for uniform grids (constant
//! `Δ`, no materialised time points) and one for explicit point
//! sequences.

pub mod euler_maruyama;
pub mod milstein;

/// A path step that produced a non-finite state.
///
/// The driver owning the path adds the lane index and maps this into
/// `SimError::NumericFailure`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepFailure {
    pub step: usize,
    pub value: f64,
}

#[inline]
pub(crate) fn check_finite(value: f64, step: usize) -> Result<f64, StepFailure> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StepFailure { step, value })
    }
}
