// src/batch/milstein.rs
//! Milstein Lane Kernels
//!
//! # One Factor
//!
//! Identical recurrence to the CPU Milstein kernel, fed by the lane's
//! Sobol sub-stream:
//! ```text
//! X_{k+1} = X_k + μ Δ + σ √Δ Z + ½ σ σ'_x (Δ Z² - Δ)
//! ```
//!
//! # Two Factors
//!
//! For the correlated system with drivers `W1 = Z1`,
//! `W2 = ρ Z1 + √(1-ρ²) Z2`, the multidimensional Milstein scheme adds
//! second-order terms built from the iterated Brownian integrals. The
//! off-diagonal integrals are approximated symmetrically (Lévy area
//! dropped), which makes the shared cross term
//! ```text
//! J = ½ ρ Δ (Z1² - 1) + √(1-ρ²) Δ Z1 Z2
//! ```
//! and the per-factor corrections
//! ```text
//! factor 1:  ½ σ1 ∂σ1/∂x1 Δ (Z1² - 1)  +  σ2 ∂σ1/∂x2 · J
//! factor 2:  ½ σ2 ∂σ2/∂x2 Δ (W2² - 1)  +  σ1 ∂σ2/∂x1 · J
//! ```
//! All partial derivatives are central finite differences with the same
//! step `h`, evaluated at the pre-update state `(t_k, x1_k, x2_k)`.

use crate::numerics::central_difference;
use crate::sde::{Sde, TwoFactorSde};
use crate::sobol::SobolSequence;
use crate::solvers::{check_finite, StepFailure};

#[inline]
fn advance_one<Mu, Sig>(sde: &Sde<Mu, Sig>, x: f64, t: f64, dt: f64, h: f64, z: f64) -> f64
where
    Mu: Fn(f64, f64) -> f64 + Sync,
    Sig: Fn(f64, f64) -> f64 + Sync,
{
    let diffusion = sde.diffusion(t, x);
    let diffusion_prime = central_difference(|y| sde.diffusion(t, y), x, h);
    let dw = dt.sqrt() * z;

    x + sde.drift(t, x) * dt
        + diffusion * dw
        + 0.5 * diffusion * diffusion_prime * (dw * dw - dt)
}

pub(crate) fn lane_uniform<Mu, Sig>(
    sde: &Sde<Mu, Sig>,
    delta: f64,
    h: f64,
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
        let t = (k - 1) as f64 * delta;
        let z = seq.next_normal();
        let next = advance_one(sde, row[k - 1], t, delta, h, z);
        row[k] = check_finite(next, k)?;
    }
    Ok(())
}

pub(crate) fn lane_with_points<Mu, Sig>(
    sde: &Sde<Mu, Sig>,
    points: &[f64],
    h: f64,
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
        let z = seq.next_normal();
        let next = advance_one(sde, row[k - 1], t, dt, h, z);
        row[k] = check_finite(next, k)?;
    }
    Ok(())
}

/// Advance both factors by one Milstein step from the pre-update state.
#[inline]
#[allow(clippy::too_many_arguments)]
fn advance_two<Mu1, Sig1, Mu2, Sig2>(
    sde: &TwoFactorSde<Mu1, Sig1, Mu2, Sig2>,
    x1: f64,
    x2: f64,
    t: f64,
    dt: f64,
    h: f64,
    rho: f64,
    orth: f64,
    z1: f64,
    z2: f64,
) -> (f64, f64)
where
    Mu1: Fn(f64, f64, f64) -> f64 + Sync,
    Sig1: Fn(f64, f64, f64) -> f64 + Sync,
    Mu2: Fn(f64, f64, f64) -> f64 + Sync,
    Sig2: Fn(f64, f64, f64) -> f64 + Sync,
{
    let sqrt_dt = dt.sqrt();
    let w1 = z1;
    let w2 = rho * z1 + orth * z2;

    let sig1 = sde.diffusion1(t, x1, x2);
    let sig2 = sde.diffusion2(t, x1, x2);

    // Partial derivatives of both diffusions, same step h for every one.
    let d_sig1_dx1 = central_difference(|y| sde.diffusion1(t, y, x2), x1, h);
    let d_sig1_dx2 = central_difference(|y| sde.diffusion1(t, x1, y), x2, h);
    let d_sig2_dx1 = central_difference(|y| sde.diffusion2(t, y, x2), x1, h);
    let d_sig2_dx2 = central_difference(|y| sde.diffusion2(t, x1, y), x2, h);

    // Shared off-diagonal integral approximation (Lévy area dropped).
    let cross = 0.5 * rho * dt * (z1 * z1 - 1.0) + orth * dt * z1 * z2;

    let correction1 = 0.5 * sig1 * d_sig1_dx1 * dt * (z1 * z1 - 1.0) + sig2 * d_sig1_dx2 * cross;
    let correction2 = 0.5 * sig2 * d_sig2_dx2 * dt * (w2 * w2 - 1.0) + sig1 * d_sig2_dx1 * cross;

    let next1 = x1 + sde.drift1(t, x1, x2) * dt + sig1 * sqrt_dt * w1 + correction1;
    let next2 = x2 + sde.drift2(t, x1, x2) * dt + sig2 * sqrt_dt * w2 + correction2;

    (next1, next2)
}

pub(crate) fn lane_two_factor_uniform<Mu1, Sig1, Mu2, Sig2>(
    sde: &TwoFactorSde<Mu1, Sig1, Mu2, Sig2>,
    rho: f64,
    delta: f64,
    h: f64,
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
        let t = (k - 1) as f64 * delta;
        let z1 = seq.next_normal();
        let z2 = seq.next_normal();

        let (next1, next2) = advance_two(sde, row[k - 1], x2, t, delta, h, rho, orth, z1, z2);
        row[k] = check_finite(next1, k)?;
        x2 = check_finite(next2, k)?;
    }
    Ok(())
}

pub(crate) fn lane_two_factor_with_points<Mu1, Sig1, Mu2, Sig2>(
    sde: &TwoFactorSde<Mu1, Sig1, Mu2, Sig2>,
    rho: f64,
    points: &[f64],
    h: f64,
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
        let z1 = seq.next_normal();
        let z2 = seq.next_normal();

        let (next1, next2) = advance_two(sde, row[k - 1], x2, t, dt, h, rho, orth, z1, z2);
        row[k] = check_finite(next1, k)?;
        x2 = check_finite(next2, k)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::DEFAULT_DERIVATIVE_STEP;
    use crate::sde::{Sde, TwoFactorSde};

    #[test]
    fn test_one_factor_constant_diffusion_matches_euler() {
        // σ' = 0 for ABM, so Milstein and Euler lanes must coincide
        let sde = Sde::new(|_t, _x| 0.1, |_t, _x| 0.5, 1.0);
        let mut milstein_row = vec![0.0; 17];
        let mut euler_row = vec![0.0; 17];

        lane_uniform(&sde, 0.0625, DEFAULT_DERIVATIVE_STEP, 7, &mut milstein_row).unwrap();
        crate::batch::euler_maruyama::lane_uniform(&sde, 0.0625, 7, &mut euler_row).unwrap();

        for (a, b) in milstein_row.iter().zip(euler_row.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_two_factor_constant_diffusions_match_euler() {
        // All four partials vanish: the correction terms must disappear
        // and the two-factor Milstein lane reduce to the Euler lane.
        let sde = TwoFactorSde::new(
            |_t, x1, _x2| 0.02 * x1,
            |_t, _x1, _x2| 1.0,
            |_t, _x1, x2| -0.5 * x2,
            |_t, _x1, _x2| 1.0,
            (10.0, 1.0),
        );

        let mut milstein_row = vec![0.0; 9];
        let mut euler_row = vec![0.0; 9];
        lane_two_factor_uniform(&sde, 0.6, 0.125, DEFAULT_DERIVATIVE_STEP, 2, &mut milstein_row)
            .unwrap();
        crate::batch::euler_maruyama::lane_two_factor_uniform(&sde, 0.6, 0.125, 2, &mut euler_row)
            .unwrap();

        for (a, b) in milstein_row.iter().zip(euler_row.iter()) {
            assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_two_factor_correction_algebra() {
        // Hand-check one step of the correction terms against the
        // documented formulas, with diffusions linear in both states so
        // every partial is known exactly.
        let sde = TwoFactorSde::new(
            |_t, _x1, _x2| 0.0,
            |_t, x1, x2| 0.3 * x1 + 0.1 * x2, // ∂/∂x1 = 0.3, ∂/∂x2 = 0.1
            |_t, _x1, _x2| 0.0,
            |_t, x1, x2| 0.2 * x1 + 0.4 * x2, // ∂/∂x1 = 0.2, ∂/∂x2 = 0.4
            (2.0, 3.0),
        );

        let (rho, dt, z1, z2) = (0.8_f64, 0.25_f64, 0.7_f64, -1.1_f64);
        let orth = (1.0 - rho * rho).sqrt();
        let (next1, next2) = advance_two(
            &sde,
            2.0,
            3.0,
            0.0,
            dt,
            DEFAULT_DERIVATIVE_STEP,
            rho,
            orth,
            z1,
            z2,
        );

        let w2 = rho * z1 + orth * z2;
        let sig1 = 0.3 * 2.0 + 0.1 * 3.0;
        let sig2 = 0.2 * 2.0 + 0.4 * 3.0;
        let cross = 0.5 * rho * dt * (z1 * z1 - 1.0) + orth * dt * z1 * z2;

        let expected1 = 2.0
            + sig1 * dt.sqrt() * z1
            + 0.5 * sig1 * 0.3 * dt * (z1 * z1 - 1.0)
            + sig2 * 0.1 * cross;
        let expected2 = 3.0
            + sig2 * dt.sqrt() * w2
            + 0.5 * sig2 * 0.4 * dt * (w2 * w2 - 1.0)
            + sig1 * 0.2 * cross;

        assert!((next1 - expected1).abs() < 1e-8, "{} vs {}", next1, expected1);
        assert!((next2 - expected2).abs() < 1e-8, "{} vs {}", next2, expected2);
    }
}
