// src/solvers/milstein.rs
//! Milstein Scheme
//!
//! # Mathematical Framework
//!
//! Extends Euler-Maruyama with the Itô correction term:
//! ```text
//! X_{k+1} = X_k + μ Δ + σ √Δ Z + ½ σ σ'_x (Δ Z² - Δ)
//! ```
//!
//! `σ'_x = ∂σ/∂x` is evaluated at `(t_k, X_k)` by central finite
//! difference over the *same* diffusion closure used for the diffusion
//! term:
//! ```text
//! σ'_x ≈ (σ(t, x + h/2) - σ(t, x - h/2)) / h
//! ```
//!
//! The derivative step `h` is a property of the kernel invocation with a
//! conservative default (`numerics::DEFAULT_DERIVATIVE_STEP`); callers
//! may override it, and the same `h` serves every step of a simulation.
//!
//! # Convergence Properties
//!
//! - **Strong convergence**: order 1.0 (vs 0.5 for Euler-Maruyama)
//! - **Cost**: two extra diffusion evaluations per step

use crate::numerics::central_difference;
use crate::rng;
use crate::sde::Sde;
use crate::solvers::{check_finite, StepFailure};
use rand::Rng;

/// Single Milstein step from `(t, x)` over a step of width `dt`.
#[inline]
pub fn step<Mu, Sig, R>(sde: &Sde<Mu, Sig>, x: f64, t: f64, dt: f64, h: f64, rng: &mut R) -> f64
where
    Mu: Fn(f64, f64) -> f64 + Sync,
    Sig: Fn(f64, f64) -> f64 + Sync,
    R: Rng + ?Sized,
{
    let z = rng::get_normal_draw(rng);
    advance(sde, x, t, dt, h, z)
}

#[inline]
fn advance<Mu, Sig>(sde: &Sde<Mu, Sig>, x: f64, t: f64, dt: f64, h: f64, z: f64) -> f64
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

/// One path over a uniform grid with constant step `delta`.
pub fn sample_path_uniform<Mu, Sig, R>(
    sde: &Sde<Mu, Sig>,
    delta: f64,
    h: f64,
    path: &mut [f64],
    rng: &mut R,
) -> Result<(), StepFailure>
where
    Mu: Fn(f64, f64) -> f64 + Sync,
    Sig: Fn(f64, f64) -> f64 + Sync,
    R: Rng + ?Sized,
{
    path[0] = sde.init_condition();
    for k in 1..path.len() {
        let t = (k - 1) as f64 * delta;
        let z = rng::get_normal_draw(rng);
        let next = advance(sde, path[k - 1], t, delta, h, z);
        path[k] = check_finite(next, k)?;
    }
    Ok(())
}

/// One path over an explicit point sequence `t0 = 0, …, tN`.
pub fn sample_path_with_points<Mu, Sig, R>(
    sde: &Sde<Mu, Sig>,
    points: &[f64],
    h: f64,
    path: &mut [f64],
    rng: &mut R,
) -> Result<(), StepFailure>
where
    Mu: Fn(f64, f64) -> f64 + Sync,
    Sig: Fn(f64, f64) -> f64 + Sync,
    R: Rng + ?Sized,
{
    path[0] = sde.init_condition();
    for k in 1..path.len() {
        let t = points[k - 1];
        let dt = points[k] - points[k - 1];
        let z = rng::get_normal_draw(rng);
        let next = advance(sde, path[k - 1], t, dt, h, z);
        path[k] = check_finite(next, k)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::DEFAULT_DERIVATIVE_STEP;
    use crate::rng::seed_rng_from_u64;
    use crate::sde::Sde;

    #[test]
    fn test_zero_diffusion_matches_euler_exactly() {
        // With σ ≡ 0 the correction vanishes and Milstein is forward Euler
        let sde = Sde::new(|_t, x| -0.5 * x, |_t, _x| 0.0, 10.0);

        let mut milstein_path = vec![0.0; 21];
        sample_path_uniform(
            &sde,
            0.05,
            DEFAULT_DERIVATIVE_STEP,
            &mut milstein_path,
            &mut seed_rng_from_u64(11),
        )
        .unwrap();

        let mut euler_path = vec![0.0; 21];
        crate::solvers::euler_maruyama::sample_path_uniform(
            &sde,
            0.05,
            &mut euler_path,
            &mut seed_rng_from_u64(11),
        )
        .unwrap();

        assert_eq!(milstein_path, euler_path);
    }

    #[test]
    fn test_correction_uses_diffusion_derivative() {
        // GBM: σ(x) = 0.2x, σ' = 0.2; with a forced draw the correction is
        // ½ · 0.2x · 0.2 · (ΔZ² - Δ)
        let sde = Sde::new(|_t, _x| 0.0, |_t, x| 0.2 * x, 100.0);
        let dt = 0.25;
        let z = 1.5;
        let next = advance(&sde, 100.0, 0.0, dt, DEFAULT_DERIVATIVE_STEP, z);

        let dw = dt.sqrt() * z;
        let expected = 100.0 + 20.0 * dw + 0.5 * 20.0 * 0.2 * (dw * dw - dt);
        assert!((next - expected).abs() < 1e-6, "{} vs {}", next, expected);
    }

    #[test]
    fn test_derivative_step_override_is_honoured() {
        // A diffusion with large curvature makes the h-dependence visible.
        // z = 2 keeps (ΔW² - Δ) well away from zero.
        let sde = Sde::new(|_t, _x| 0.0, |_t, x: f64| (5.0 * x).sin(), 1.0);
        let coarse = advance(&sde, 1.0, 0.0, 0.1, 0.5, 2.0);
        let fine = advance(&sde, 1.0, 0.0, 0.1, 1e-7, 2.0);
        assert!((coarse - fine).abs() > 1e-6);
    }
}
