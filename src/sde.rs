// src/sde.rs
//! SDE Value Objects
//!
//! An SDE of the form `dx = μ(t, x) dt + σ(t, x) dW` is represented as an
//! immutable bundle of its drift closure, its diffusion closure, and the
//! initial condition. The closures are black-box numeric functions: the
//! kernels never assume closed-form derivatives (the Milstein kernels
//! differentiate the diffusion closure numerically).
//!
//! Both bundles are generic over the closure types, so every kernel is
//! monomorphised per model and pays no virtual-call overhead in the inner
//! loop. Closures must be `Sync`: a single bundle is shared read-only by
//! all workers of a simulation and must be reentrant and side-effect-free.

/// One-factor SDE: drift and diffusion over `(t, x)` plus `x0`.
#[derive(Clone)]
pub struct Sde<Mu, Sig>
where
    Mu: Fn(f64, f64) -> f64 + Sync,
    Sig: Fn(f64, f64) -> f64 + Sync,
{
    drift: Mu,
    diffusion: Sig,
    init_condition: f64,
}

impl<Mu, Sig> Sde<Mu, Sig>
where
    Mu: Fn(f64, f64) -> f64 + Sync,
    Sig: Fn(f64, f64) -> f64 + Sync,
{
    pub fn new(drift: Mu, diffusion: Sig, init_condition: f64) -> Self {
        Sde {
            drift,
            diffusion,
            init_condition,
        }
    }

    /// Drift coefficient `μ(t, x)`
    #[inline]
    pub fn drift(&self, t: f64, x: f64) -> f64 {
        (self.drift)(t, x)
    }

    /// Diffusion coefficient `σ(t, x)`
    #[inline]
    pub fn diffusion(&self, t: f64, x: f64) -> f64 {
        (self.diffusion)(t, x)
    }

    pub fn init_condition(&self) -> f64 {
        self.init_condition
    }
}

/// Two-factor SDE: a pair of coupled bundles over `(t, x1, x2)`.
///
/// Factor 1 is the observed process (the one surfaced in the ensemble);
/// factor 2 is an internal driver that may feed factor 1's coefficients,
/// e.g. a stochastic variance. Both factors see the *pre-update* state
/// `(x1_k, x2_k)` at every step (explicit coupling).
#[derive(Clone)]
pub struct TwoFactorSde<Mu1, Sig1, Mu2, Sig2>
where
    Mu1: Fn(f64, f64, f64) -> f64 + Sync,
    Sig1: Fn(f64, f64, f64) -> f64 + Sync,
    Mu2: Fn(f64, f64, f64) -> f64 + Sync,
    Sig2: Fn(f64, f64, f64) -> f64 + Sync,
{
    drift1: Mu1,
    diffusion1: Sig1,
    drift2: Mu2,
    diffusion2: Sig2,
    init_conditions: (f64, f64),
}

impl<Mu1, Sig1, Mu2, Sig2> TwoFactorSde<Mu1, Sig1, Mu2, Sig2>
where
    Mu1: Fn(f64, f64, f64) -> f64 + Sync,
    Sig1: Fn(f64, f64, f64) -> f64 + Sync,
    Mu2: Fn(f64, f64, f64) -> f64 + Sync,
    Sig2: Fn(f64, f64, f64) -> f64 + Sync,
{
    pub fn new(
        drift1: Mu1,
        diffusion1: Sig1,
        drift2: Mu2,
        diffusion2: Sig2,
        init_conditions: (f64, f64),
    ) -> Self {
        TwoFactorSde {
            drift1,
            diffusion1,
            drift2,
            diffusion2,
            init_conditions,
        }
    }

    /// Drift of the observed factor, `μ1(t, x1, x2)`
    #[inline]
    pub fn drift1(&self, t: f64, x1: f64, x2: f64) -> f64 {
        (self.drift1)(t, x1, x2)
    }

    /// Diffusion of the observed factor, `σ1(t, x1, x2)`
    #[inline]
    pub fn diffusion1(&self, t: f64, x1: f64, x2: f64) -> f64 {
        (self.diffusion1)(t, x1, x2)
    }

    /// Drift of the driving factor, `μ2(t, x1, x2)`
    #[inline]
    pub fn drift2(&self, t: f64, x1: f64, x2: f64) -> f64 {
        (self.drift2)(t, x1, x2)
    }

    /// Diffusion of the driving factor, `σ2(t, x1, x2)`
    #[inline]
    pub fn diffusion2(&self, t: f64, x1: f64, x2: f64) -> f64 {
        (self.diffusion2)(t, x1, x2)
    }

    pub fn init_conditions(&self) -> (f64, f64) {
        self.init_conditions
    }
}
