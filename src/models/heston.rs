// src/models/heston.rs
//! Heston Stochastic Volatility Model
//!
//! Asset price with mean-reverting stochastic variance:
//! ```text
//! dS_t = μ S_t dt + σ S_t √V_t dW_t^(1)
//! dV_t = κ(θ - V_t) dt + η √V_t dW_t^(2)
//! ```
//!
//! Where:
//! - S_t: asset price (factor 1, surfaced in the ensemble)
//! - V_t: instantaneous variance (factor 2, internal driver)
//! - κ: mean-reversion speed, θ: long-run variance, η: vol-of-vol
//! - the Brownian drivers carry a correlation ρ supplied per simulation
//!
//! # Feller Condition
//!
//! Variance stays strictly positive when `2κθ > η²`. A violation is
//! reported as a warning rather than an error: the kernels floor the
//! variance argument through `√|V|`-style coefficients, and practitioners
//! routinely run Feller-violating parameter sets.

use crate::error::{validation::*, SimError, SimResult};
use crate::sde::TwoFactorSde;

#[derive(Clone, Copy, Debug)]
pub struct HestonModel {
    pub mu: f64,    // Asset drift
    pub sigma: f64, // Asset volatility scale
    pub kappa: f64, // Variance mean-reversion speed
    pub theta: f64, // Long-run variance
    pub eta: f64,   // Volatility of variance
    pub s0: f64,    // Initial asset price
    pub v0: f64,    // Initial variance
}

impl HestonModel {
    pub fn new(
        mu: f64,
        sigma: f64,
        kappa: f64,
        theta: f64,
        eta: f64,
        s0: f64,
        v0: f64,
    ) -> SimResult<Self> {
        let model = HestonModel {
            mu,
            sigma,
            kappa,
            theta,
            eta,
            s0,
            v0,
        };
        model.validate()?;

        let feller = 2.0 * kappa * theta;
        if feller <= eta * eta {
            eprintln!("WARNING!: Feller condition violated (2κθ ≤ η²). Variance may hit zero.");
        }

        Ok(model)
    }

    fn validate(&self) -> SimResult<()> {
        validate_finite("mu", self.mu)?;
        validate_positive("sigma", self.sigma)?;
        validate_positive("kappa", self.kappa)?;
        validate_positive("theta", self.theta)?;
        validate_positive("eta", self.eta)?;
        validate_positive("s0", self.s0)?;
        validate_non_negative("v0", self.v0)?;

        if self.theta > 1.0 {
            return Err(SimError::InvalidParameters {
                parameter: "theta".to_string(),
                value: self.theta,
                constraint: "long-run variance >1 (100% vol) is unrealistic".to_string(),
            });
        }

        Ok(())
    }

    /// Build the coupled two-factor SDE bundle `(price, variance)`.
    ///
    /// The variance enters the price diffusion through `√|V|`, so a
    /// slightly negative discretised variance cannot produce NaN.
    pub fn sdes(
        &self,
    ) -> TwoFactorSde<
        impl Fn(f64, f64, f64) -> f64 + Sync,
        impl Fn(f64, f64, f64) -> f64 + Sync,
        impl Fn(f64, f64, f64) -> f64 + Sync,
        impl Fn(f64, f64, f64) -> f64 + Sync,
    > {
        let mu = self.mu;
        let sigma = self.sigma;
        let kappa = self.kappa;
        let theta = self.theta;
        let eta = self.eta;
        TwoFactorSde::new(
            move |_t, s, _v| mu * s,
            move |_t, s, v: f64| sigma * s * v.abs().sqrt(),
            move |_t, _s, v| kappa * (theta - v),
            move |_t, _s, v: f64| eta * v.abs().sqrt(),
            (self.s0, self.v0),
        )
    }
}
