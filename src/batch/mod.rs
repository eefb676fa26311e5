// src/batch/mod.rs
//! Data-Parallel Lane Engine
//!
//! The accelerator-style target. Where the CPU target launches one task
//! per path, this engine performs a *single* data-parallel dispatch over
//! `M` lanes: every lane runs the same per-step kernel against its own
//! row slab of a flat row-major buffer, and one join (the analogue of a
//! device-to-host synchronisation) happens before the buffer is handed
//! back. There are no suspension points inside a lane.
//!
//! Randomness comes from the quasi-random regime: a shared
//! one-dimensional Sobol sequence, with lane `i` skipping to offset `i`
//! in the direction-numbers domain before drawing (see [`crate::sobol`]).
//! The result is deterministic unconditionally; no seed is involved.
//!
//! Failure handling:
//! - a lane whose state turns non-finite records the offending step; the
//!   dispatch always runs to completion and the *first* failing lane (in
//!   lane order) is reported as `NumericFailure`;
//! - a panic escaping a lane (e.g. from a user closure) is caught at the
//!   launch boundary and surfaced as `BackendFailure` with the payload
//!   message. Partial buffers are never returned.

pub mod euler_maruyama;
pub mod milstein;

use crate::error::{SimError, SimResult};
use crate::grid::TimeGrid;
use crate::sde::{Sde, TwoFactorSde};
use crate::solvers::StepFailure;
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Minimum lanes per work block, sized against the CPU topology so the
/// scheduler is not swamped by tiny chunks at large `M`.
fn lane_block(iterations: usize) -> usize {
    (iterations / (num_cpus::get() * 8)).max(1)
}

fn panic_reason(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "lane dispatch panicked".to_string()
    }
}

/// Run one kernel over all lanes and synchronise.
///
/// `kernel(lane, row)` fills the lane's row slab of `cols` values. Rows
/// are disjoint, so lanes share nothing but the read-only model.
fn launch<K>(iterations: usize, cols: usize, kernel: K) -> SimResult<Vec<f64>>
where
    K: Fn(usize, &mut [f64]) -> Result<(), StepFailure> + Sync,
{
    let mut buffer = vec![0.0f64; iterations * cols];
    let block = lane_block(iterations);

    let failures = catch_unwind(AssertUnwindSafe(|| {
        buffer
            .par_chunks_mut(cols)
            .with_min_len(block)
            .enumerate()
            .filter_map(|(lane, row)| kernel(lane, row).err().map(|failure| (lane, failure)))
            .collect::<Vec<_>>()
    }))
    .map_err(|payload| SimError::BackendFailure {
        reason: panic_reason(payload),
    })?;

    if let Some((lane, failure)) = failures.into_iter().min_by_key(|(lane, _)| *lane) {
        return Err(SimError::NumericFailure {
            lane,
            step: failure.step,
            value: failure.value,
        });
    }

    Ok(buffer)
}

/// One-factor Euler over all lanes; returns the row-major `M × (N+1)` buffer.
pub fn euler_one_factor<Mu, Sig>(
    sde: &Sde<Mu, Sig>,
    grid: &TimeGrid,
    iterations: usize,
) -> SimResult<Vec<f64>>
where
    Mu: Fn(f64, f64) -> f64 + Sync,
    Sig: Fn(f64, f64) -> f64 + Sync,
{
    let cols = grid.step_count() + 1;
    match grid.uniform_delta() {
        Some(delta) => launch(iterations, cols, |lane, row| {
            euler_maruyama::lane_uniform(sde, delta, lane, row)
        }),
        None => {
            let points = grid.points();
            launch(iterations, cols, |lane, row| {
                euler_maruyama::lane_with_points(sde, &points, lane, row)
            })
        }
    }
}

/// One-factor Milstein over all lanes with derivative step `h`.
pub fn milstein_one_factor<Mu, Sig>(
    sde: &Sde<Mu, Sig>,
    grid: &TimeGrid,
    h: f64,
    iterations: usize,
) -> SimResult<Vec<f64>>
where
    Mu: Fn(f64, f64) -> f64 + Sync,
    Sig: Fn(f64, f64) -> f64 + Sync,
{
    let cols = grid.step_count() + 1;
    match grid.uniform_delta() {
        Some(delta) => launch(iterations, cols, |lane, row| {
            milstein::lane_uniform(sde, delta, h, lane, row)
        }),
        None => {
            let points = grid.points();
            launch(iterations, cols, |lane, row| {
                milstein::lane_with_points(sde, &points, h, lane, row)
            })
        }
    }
}

/// Correlated two-factor Euler; only factor-1 values land in the buffer.
pub fn euler_two_factor<Mu1, Sig1, Mu2, Sig2>(
    sde: &TwoFactorSde<Mu1, Sig1, Mu2, Sig2>,
    rho: f64,
    grid: &TimeGrid,
    iterations: usize,
) -> SimResult<Vec<f64>>
where
    Mu1: Fn(f64, f64, f64) -> f64 + Sync,
    Sig1: Fn(f64, f64, f64) -> f64 + Sync,
    Mu2: Fn(f64, f64, f64) -> f64 + Sync,
    Sig2: Fn(f64, f64, f64) -> f64 + Sync,
{
    let cols = grid.step_count() + 1;
    match grid.uniform_delta() {
        Some(delta) => launch(iterations, cols, |lane, row| {
            euler_maruyama::lane_two_factor_uniform(sde, rho, delta, lane, row)
        }),
        None => {
            let points = grid.points();
            launch(iterations, cols, |lane, row| {
                euler_maruyama::lane_two_factor_with_points(sde, rho, &points, lane, row)
            })
        }
    }
}

/// Correlated two-factor Milstein; only factor-1 values land in the buffer.
pub fn milstein_two_factor<Mu1, Sig1, Mu2, Sig2>(
    sde: &TwoFactorSde<Mu1, Sig1, Mu2, Sig2>,
    rho: f64,
    grid: &TimeGrid,
    h: f64,
    iterations: usize,
) -> SimResult<Vec<f64>>
where
    Mu1: Fn(f64, f64, f64) -> f64 + Sync,
    Sig1: Fn(f64, f64, f64) -> f64 + Sync,
    Mu2: Fn(f64, f64, f64) -> f64 + Sync,
    Sig2: Fn(f64, f64, f64) -> f64 + Sync,
{
    let cols = grid.step_count() + 1;
    match grid.uniform_delta() {
        Some(delta) => launch(iterations, cols, |lane, row| {
            milstein::lane_two_factor_uniform(sde, rho, delta, h, lane, row)
        }),
        None => {
            let points = grid.points();
            launch(iterations, cols, |lane, row| {
                milstein::lane_two_factor_with_points(sde, rho, &points, h, lane, row)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TimeGrid;
    use crate::sde::Sde;

    #[test]
    fn test_launch_is_deterministic() {
        let sde = Sde::new(|_t, x| 0.05 * x, |_t, x| 0.2 * x, 100.0);
        let grid = TimeGrid::uniform(1.0, 32).unwrap();

        let a = euler_one_factor(&sde, &grid, 64).unwrap();
        let b = euler_one_factor(&sde, &grid, 64).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_lanes_draw_distinct_sub_streams() {
        let sde = Sde::new(|_t, _x| 0.0, |_t, _x| 1.0, 0.0);
        let grid = TimeGrid::uniform(1.0, 8).unwrap();

        let buffer = euler_one_factor(&sde, &grid, 16).unwrap();
        let rows: Vec<&[f64]> = buffer.chunks(9).collect();
        for i in 0..rows.len() {
            for j in (i + 1)..rows.len() {
                assert_ne!(rows[i], rows[j], "lanes {} and {} coincide", i, j);
            }
        }
    }

    #[test]
    fn test_first_failing_lane_is_reported() {
        // Lane-independent blow-up at a known step: drift explodes once
        // t passes 0.5, so every lane fails at the same step and lane 0
        // must be the one reported.
        let sde = Sde::new(
            |t, _x| if t >= 0.5 { f64::NAN } else { 0.0 },
            |_t, _x| 0.0,
            1.0,
        );
        let grid = TimeGrid::uniform(1.0, 4).unwrap();
        let err = euler_one_factor(&sde, &grid, 8).unwrap_err();
        match err {
            SimError::NumericFailure { lane, step, .. } => {
                assert_eq!(lane, 0);
                assert_eq!(step, 3);
            }
            other => panic!("expected NumericFailure, got {}", other),
        }
    }

    #[test]
    fn test_panicking_closure_becomes_backend_failure() {
        let sde = Sde::new(
            |_t, _x| panic!("model blew up"),
            |_t, _x| 0.0,
            1.0,
        );
        let grid = TimeGrid::uniform(1.0, 2).unwrap();
        let err = euler_one_factor(&sde, &grid, 4).unwrap_err();
        match err {
            SimError::BackendFailure { reason } => assert!(reason.contains("model blew up")),
            other => panic!("expected BackendFailure, got {}", other),
        }
    }
}
