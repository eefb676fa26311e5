// src/models/cev.rs
//! Constant Elasticity of Variance
//!
//! ```text
//! dX_t = μ X_t dt + σ X_t^β dW_t
//! ```
//!
//! The elasticity parameter β interpolates between ABM-like (β = 0) and
//! GBM-like (β = 1) diffusion. The diffusion coefficient is genuinely
//! state-nonlinear for 0 < β < 1, which makes CEV the natural exercise
//! for the Milstein kernels' numerical diffusion derivative.

use crate::error::{validation::*, SimResult};
use crate::sde::Sde;

#[derive(Clone, Copy, Debug)]
pub struct ConstantElasticityOfVariance {
    pub mu: f64,
    pub sigma: f64,
    pub beta: f64,
    pub x0: f64,
}

impl ConstantElasticityOfVariance {
    pub fn new(mu: f64, sigma: f64, beta: f64, x0: f64) -> SimResult<Self> {
        validate_finite("mu", mu)?;
        validate_positive("sigma", sigma)?;
        validate_finite("beta", beta)?;
        validate_non_negative("x0", x0)?;
        Ok(ConstantElasticityOfVariance {
            mu,
            sigma,
            beta,
            x0,
        })
    }

    pub fn sde(
        &self,
    ) -> Sde<impl Fn(f64, f64) -> f64 + Sync, impl Fn(f64, f64) -> f64 + Sync> {
        let mu = self.mu;
        let sigma = self.sigma;
        let beta = self.beta;
        Sde::new(
            move |_t, x| mu * x,
            move |_t, x: f64| sigma * x.abs().powf(beta),
            self.x0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cev_first_step_coefficients() {
        // mu=0.05, sigma=0.01, beta=0.25, x0=100:
        // drift(0, 100) = 5, diffusion(0, 100) = 0.01 * 100^0.25 ≈ 0.0316
        let cev = ConstantElasticityOfVariance::new(0.05, 0.01, 0.25, 100.0).unwrap();
        let sde = cev.sde();
        assert!((sde.drift(0.0, 100.0) - 5.0).abs() < 1e-12);
        assert!((sde.diffusion(0.0, 100.0) - 0.03162).abs() < 1e-4);
    }

    #[test]
    fn test_cev_limits() {
        // beta = 1 degenerates to GBM diffusion, beta = 0 to ABM diffusion
        let gbm_like = ConstantElasticityOfVariance::new(0.0, 0.2, 1.0, 50.0).unwrap();
        assert!((gbm_like.sde().diffusion(0.0, 50.0) - 10.0).abs() < 1e-12);

        let abm_like = ConstantElasticityOfVariance::new(0.0, 0.2, 0.0, 50.0).unwrap();
        assert!((abm_like.sde().diffusion(0.0, 50.0) - 0.2).abs() < 1e-12);
    }
}
