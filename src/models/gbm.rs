// src/models/gbm.rs
//! Geometric Brownian Motion
//!
//! ```text
//! dX_t = μ X_t dt + σ X_t dW_t
//! ```
//!
//! The workhorse lognormal model: terminal mean `x0 · exp(μT)`, strictly
//! positive paths in the continuous limit.

use crate::error::{validation::*, SimResult};
use crate::sde::Sde;

#[derive(Clone, Copy, Debug)]
pub struct GeometricBrownianMotion {
    pub mu: f64,
    pub sigma: f64,
    pub x0: f64,
}

impl GeometricBrownianMotion {
    pub fn new(mu: f64, sigma: f64, x0: f64) -> SimResult<Self> {
        validate_finite("mu", mu)?;
        validate_positive("sigma", sigma)?;
        validate_finite("x0", x0)?;
        Ok(GeometricBrownianMotion { mu, sigma, x0 })
    }

    /// Build the SDE value object for this parameter set.
    pub fn sde(
        &self,
    ) -> Sde<impl Fn(f64, f64) -> f64 + Sync, impl Fn(f64, f64) -> f64 + Sync> {
        let mu = self.mu;
        let sigma = self.sigma;
        Sde::new(
            move |_t, x| mu * x,
            move |_t, x| sigma * x,
            self.x0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gbm_coefficients() {
        let gbm = GeometricBrownianMotion::new(0.05, 0.01, 100.0).unwrap();
        let sde = gbm.sde();
        assert_eq!(sde.drift(0.0, 100.0), 5.0);
        assert_eq!(sde.diffusion(0.0, 100.0), 1.0);
        assert_eq!(sde.init_condition(), 100.0);
    }

    #[test]
    fn test_gbm_rejects_bad_parameters() {
        assert!(GeometricBrownianMotion::new(f64::NAN, 0.2, 100.0).is_err());
        assert!(GeometricBrownianMotion::new(0.05, 0.0, 100.0).is_err());
        assert!(GeometricBrownianMotion::new(0.05, -0.2, 100.0).is_err());
    }
}
