// src/models/abm.rs
//! Arithmetic Brownian Motion
//!
//! ```text
//! dX_t = μ dt + σ dW_t
//! ```
//!
//! Constant coefficients; `X_T ~ N(x0 + μT, σ²T)`. With zero drift and
//! unit diffusion this is plain Brownian motion, which makes the model
//! the reference case for distributional tests.

use crate::error::{validation::*, SimResult};
use crate::sde::Sde;

#[derive(Clone, Copy, Debug)]
pub struct ArithmeticBrownianMotion {
    pub mu: f64,
    pub sigma: f64,
    pub x0: f64,
}

impl ArithmeticBrownianMotion {
    pub fn new(mu: f64, sigma: f64, x0: f64) -> SimResult<Self> {
        validate_finite("mu", mu)?;
        validate_positive("sigma", sigma)?;
        validate_finite("x0", x0)?;
        Ok(ArithmeticBrownianMotion { mu, sigma, x0 })
    }

    pub fn sde(
        &self,
    ) -> Sde<impl Fn(f64, f64) -> f64 + Sync, impl Fn(f64, f64) -> f64 + Sync> {
        let mu = self.mu;
        let sigma = self.sigma;
        Sde::new(move |_t, _x| mu, move |_t, _x| sigma, self.x0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abm_coefficients() {
        let abm = ArithmeticBrownianMotion::new(0.0, 1.0, 1.0).unwrap();
        let sde = abm.sde();
        assert_eq!(sde.drift(0.3, 57.0), 0.0);
        assert_eq!(sde.diffusion(0.3, 57.0), 1.0);
        assert_eq!(sde.init_condition(), 1.0);
    }
}
