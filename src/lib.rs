//! # sde-paths: Monte Carlo Path Simulation for SDEs
//!
//! A Rust library that turns a stochastic differential equation (drift,
//! diffusion, initial condition) into a large ensemble of discretised
//! sample paths over a fixed horizon.
//!
//! ## Key Features
//!
//! - **Two schemes**: Euler-Maruyama and Milstein (with a numerical
//!   diffusion derivative, so models stay black-box closures)
//! - **One and two factors**: scalar models, or correlated pairs such as
//!   an asset with stochastic variance
//! - **Two execution targets**: a multi-core CPU engine (one task per
//!   path, pseudo-random streams) and a data-parallel lane engine (one
//!   dispatch over all lanes, Sobol quasi-random sub-streams)
//! - **Deterministic**: a fixed master seed reproduces CPU ensembles
//!   bit-for-bit; the lane engine is deterministic by construction
//! - **Robust failure surface**: invalid inputs, non-finite states and
//!   backend panics all come back as typed errors
//!
//! ## Quick Start
//!
//! ```rust
//! use sde_paths::models::GeometricBrownianMotion;
//! use sde_paths::{simulate, Scheme, SimConfig, Target, TimeSpec};
//!
//! let gbm = GeometricBrownianMotion::new(0.05, 0.2, 100.0).expect("valid parameters");
//! let config = SimConfig {
//!     scheme: Scheme::Milstein,
//!     target: Target::Cpu,
//!     iterations: 10_000,
//!     seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let time = TimeSpec::Uniform { horizon: 1.0, steps: 360 };
//! let ensemble = simulate(&gbm.sde(), &time, &config).expect("valid configuration");
//!
//! assert_eq!(ensemble.iterations(), 10_000);
//! assert_eq!(ensemble.step_count(), 360);
//! ```
//!
//! ## Mathematical Foundation
//!
//! For `dX_t = μ(t, X) dt + σ(t, X) dW_t` the engine discretises over the
//! time grid `t0 = 0, …, tN` and marches each path with the selected
//! scheme; two-factor systems use correlated Brownian drivers built from
//! independent normals via `W2 = ρ Z1 + √(1-ρ²) Z2`.

// Module declarations
pub mod batch;
pub mod engine;
pub mod ensemble;
pub mod error;
pub mod grid;
pub mod models;
pub mod numerics;
pub mod rng;
pub mod sde;
pub mod sobol;
pub mod solvers;
pub mod summary;

// Re-export commonly used types for convenience
pub use engine::{
    simulate, simulate_two_factor, OneFactorSimulation, Scheme, SimConfig, Target,
    TwoFactorSimulation,
};
pub use ensemble::Ensemble;
pub use error::{SimError, SimResult};
pub use grid::{TimeGrid, TimeSpec};
pub use sde::{Sde, TwoFactorSde};
