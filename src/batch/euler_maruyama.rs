// src/batch/euler_maruyama.rs
//! Euler-Maruyama Lane Kernels
//!
//! Per-lane step loops for the data-parallel target. Every lane obtains
//! its quasi-random sub-stream by skipping to its lane index and then
//! draws sequentially; the recurrence itself is identical to the CPU
//! kernel:
//! ```text
//! X_{k+1} = X_k + μ(t_k, X_k) Δ_k + σ(t_k, X_k) √Δ_k Z_k
//! ```
//! with `t_k = (k-1)·Δ` on uniform grids; the drift and diffusion are
//! always evaluated at the *time*, never at the raw step index.
//!
//! Two-factor lanes draw the pair `(Z1, Z2)` per step, Z1 first, and
//! correlate the drivers as `W1 = Z1`, `W2 = ρ Z1 + √(1-ρ²) Z2`. Both
//! factors are advanced from the pre-update state; only factor 1 is
//! written to the row.

use crate::sde::{Sde, TwoFactorSde};
use crate::sobol::SobolSequence;
use crate::solvers::{check_finite, StepFailure};

pub(crate) fn lane_uniform<Mu, Sig>(
    sde: &Sde<Mu, Sig>,
    delta: f64,
    lane: usize,
    row: &mut [f64],
) -> Result<(), StepFailure>
where
    Mu: Fn(f64, f64) -> f64 + Sync,
    Sig: Fn(f64, f64) -> f64 + Sync,
{
    let mut seq = SobolSequence::at_offset(lane as u32);
    let sqrt_delta = delta.sqrt();

    row[0] = sde.init_condition();
    for k in 1..row.len() {
        let t = (k - 1) as f64 * delta;
        let prev = row[k - 1];
        let z = seq.next_normal();
        let next = prev + sde.drift(t, prev) * delta + sde.diffusion(t, prev) * sqrt_delta * z;
        row[k] = check_finite(next, k)?;
    }
    Ok(())
}

pub(crate) fn lane_with_points<Mu, Sig>(
    sde: &Sde<Mu, Sig>,
    points: &[f64],
    lane: usize,
    row: &mut [f64],
) -> Result<(), StepFailure>
where
    Mu: Fn(f64, f64) -> f64 + Sync,
    Sig: Fn(f64, f64) -> f64 + Sync,
{
    let mut seq = SobolSequence::at_offset(lane as u32);

    row[0] = sde.init_condition();
    for k in 1..row.len() {
        let t = points[k - 1];
        let dt = points[k] - points[k - 1];
        let prev = row[k - 1];
        let z = seq.next_normal();
        let next = prev + sde.drift(t, prev) * dt + sde.diffusion(t, prev) * dt.sqrt() * z;
        row[k] = check_finite(next, k)?;
    }
    Ok(())
}

pub(crate) fn lane_two_factor_uniform<Mu1, Sig1, Mu2, Sig2>(
    sde: &TwoFactorSde<Mu1, Sig1, Mu2, Sig2>,
    rho: f64,
    delta: f64,
    lane: usize,
    row: &mut [f64],
) -> Result<(), StepFailure>
where
    Mu1: Fn(f64, f64, f64) -> f64 + Sync,
    Sig1: Fn(f64, f64, f64) -> f64 + Sync,
    Mu2: Fn(f64, f64, f64) -> f64 + Sync,
    Sig2: Fn(f64, f64, f64) -> f64 + Sync,
{
    let mut seq = SobolSequence::at_offset(lane as u32);
    let sqrt_delta = delta.sqrt();
    let orth = (1.0 - rho * rho).sqrt();

    let (x1_0, x2_0) = sde.init_conditions();
    row[0] = x1_0;
    let mut x2 = x2_0;

    for k in 1..row.len() {
        let t = (k - 1) as f64 * delta;
        let x1 = row[k - 1];

        let z1 = seq.next_normal();
        let z2 = seq.next_normal();
        let w1 = z1;
        let w2 = rho * z1 + orth * z2;

        let next1 =
            x1 + sde.drift1(t, x1, x2) * delta + sde.diffusion1(t, x1, x2) * sqrt_delta * w1;
        let next2 =
            x2 + sde.drift2(t, x1, x2) * delta + sde.diffusion2(t, x1, x2) * sqrt_delta * w2;

        row[k] = check_finite(next1, k)?;
        x2 = check_finite(next2, k)?;
    }
    Ok(())
}

pub(crate) fn lane_two_factor_with_points<Mu1, Sig1, Mu2, Sig2>(
    sde: &TwoFactorSde<Mu1, Sig1, Mu2, Sig2>,
    rho: f64,
    points: &[f64],
    lane: usize,
    row: &mut [f64],
) -> Result<(), StepFailure>
where
    Mu1: Fn(f64, f64, f64) -> f64 + Sync,
    Sig1: Fn(f64, f64, f64) -> f64 + Sync,
    Mu2: Fn(f64, f64, f64) -> f64 + Sync,
    Sig2: Fn(f64, f64, f64) -> f64 + Sync,
{
    let mut seq = SobolSequence::at_offset(lane as u32);
    let orth = (1.0 - rho * rho).sqrt();

    let (x1_0, x2_0) = sde.init_conditions();
    row[0] = x1_0;
    let mut x2 = x2_0;

    for k in 1..row.len() {
        let t = points[k - 1];
        let dt = points[k] - points[k - 1];
        let sqrt_dt = dt.sqrt();
        let x1 = row[k - 1];

        let z1 = seq.next_normal();
        let z2 = seq.next_normal();
        let w1 = z1;
        let w2 = rho * z1 + orth * z2;

        let next1 = x1 + sde.drift1(t, x1, x2) * dt + sde.diffusion1(t, x1, x2) * sqrt_dt * w1;
        let next2 = x2 + sde.drift2(t, x1, x2) * dt + sde.diffusion2(t, x1, x2) * sqrt_dt * w2;

        row[k] = check_finite(next1, k)?;
        x2 = check_finite(next2, k)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sde::{Sde, TwoFactorSde};

    #[test]
    fn test_uniform_and_points_lanes_agree() {
        let sde = Sde::new(|_t, x| 0.05 * x, |_t, x| 0.2 * x, 100.0);
        let points: Vec<f64> = (0..=10).map(|i| i as f64 * 0.1).collect();

        let mut a = vec![0.0; 11];
        let mut b = vec![0.0; 11];
        lane_uniform(&sde, 0.1, 5, &mut a).unwrap();
        lane_with_points(&sde, &points, 5, &mut b).unwrap();

        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-9, "{} vs {}", x, y);
        }
    }

    #[test]
    fn test_drift_sees_time_not_step_index() {
        // Drift = t itself, zero diffusion: x_N = Σ t_k Δ. If the kernel
        // passed the raw step index instead of (k-1)·Δ the sum would be
        // off by a factor 1/Δ.
        let sde = Sde::new(|t, _x| t, |_t, _x| 0.0, 0.0);
        let delta = 0.25;
        let mut row = vec![0.0; 5];
        lane_uniform(&sde, delta, 0, &mut row).unwrap();

        let expected: f64 = (0..4).map(|k| k as f64 * delta * delta).sum();
        assert!((row[4] - expected).abs() < 1e-12, "{} vs {}", row[4], expected);
    }

    #[test]
    fn test_two_factor_perfect_correlation() {
        // With ρ = 1 and identical factors the drivers coincide, so the
        // internal factor tracks the observed one exactly.
        let sde = TwoFactorSde::new(
            |_t, _x1, _x2| 0.0,
            |_t, _x1, _x2| 1.0,
            |_t, _x1, _x2| 0.0,
            |_t, _x1, _x2| 1.0,
            (0.0, 0.0),
        );

        let mut row = vec![0.0; 9];
        lane_two_factor_uniform(&sde, 1.0, 0.125, 3, &mut row).unwrap();

        // Replay the same lane stream and check factor 2 against factor 1
        let mut seq = crate::sobol::SobolSequence::at_offset(3);
        let sqrt_delta = 0.125_f64.sqrt();
        let mut x2 = 0.0;
        for k in 1..9 {
            let z1 = seq.next_normal();
            let _z2 = seq.next_normal();
            x2 += sqrt_delta * z1;
            assert!((row[k] - x2).abs() < 1e-12);
        }
    }
}
