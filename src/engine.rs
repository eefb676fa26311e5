// src/engine.rs
//! Simulation Driver
//!
//! The driver owns kernel selection and scheduling. A simulation moves
//! through three observable states:
//!
//! 1. *configured*: `new` has validated the inputs and stored them;
//! 2. *running*: `run` has launched the kernels; paths are pending;
//! 3. *complete*: every kernel has finished and the ensemble is
//!    materialised.
//!
//! There is no cancellation: a simulation runs to completion or
//! propagates the first fatal failure, and partial ensembles are never
//! returned.
//!
//! Kernel selection is by `(factor count, scheme, grid kind, target)`.
//! The factor count is fixed at the type level (one entry point per
//! factor count keeps every kernel body monomorphic), while scheme, grid
//! kind and target dispatch at runtime over a closed set of variants.
//!
//! Scheduling:
//! - **CPU target**: one independent task per path under rayon; each path
//!   owns its PRNG (seeded from the master seed, or OS entropy when none
//!   is given) and writes only its own row slab. The driver joins every
//!   task before returning, and rows follow launch order regardless of
//!   completion order.
//! - **Batch target**: a single data-parallel dispatch over all lanes
//!   with per-lane Sobol sub-streams; see [`crate::batch`]. The master
//!   seed plays no role on this target.

use crate::batch;
use crate::ensemble::Ensemble;
use crate::error::{validation::*, SimError, SimResult};
use crate::grid::{TimeGrid, TimeSpec};
use crate::numerics::DEFAULT_DERIVATIVE_STEP;
use crate::rng;
use crate::sde::{Sde, TwoFactorSde};
use crate::solvers::{euler_maruyama, milstein, StepFailure};
use rayon::prelude::*;

/// Discretisation scheme selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Euler,
    Milstein,
}

/// Execution target selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// One task per path on the thread pool, pseudo-random streams.
    Cpu,
    /// One data-parallel dispatch over all lanes, quasi-random streams.
    Batch,
}

/// Simulation configuration.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub scheme: Scheme,
    pub target: Target,
    /// Number of paths `M`.
    pub iterations: usize,
    /// Master seed for the CPU target; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Central-difference step for the Milstein kernels.
    pub derivative_step: f64,
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        validate_iterations(self.iterations)?;
        validate_positive("derivative_step", self.derivative_step)?;
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            scheme: Scheme::Euler,
            target: Target::Cpu,
            iterations: 10_000,
            seed: None,
            derivative_step: DEFAULT_DERIVATIVE_STEP,
        }
    }
}

/// Map the first per-path failure (in launch order) to the public error.
fn first_failure(failures: Vec<(usize, StepFailure)>) -> SimResult<()> {
    if let Some((lane, failure)) = failures.into_iter().min_by_key(|(lane, _)| *lane) {
        return Err(SimError::NumericFailure {
            lane,
            step: failure.step,
            value: failure.value,
        });
    }
    Ok(())
}

/// A configured one-factor simulation.
pub struct OneFactorSimulation<'a, Mu, Sig>
where
    Mu: Fn(f64, f64) -> f64 + Sync,
    Sig: Fn(f64, f64) -> f64 + Sync,
{
    sde: &'a Sde<Mu, Sig>,
    grid: TimeGrid,
    config: SimConfig,
}

impl<'a, Mu, Sig> OneFactorSimulation<'a, Mu, Sig>
where
    Mu: Fn(f64, f64) -> f64 + Sync,
    Sig: Fn(f64, f64) -> f64 + Sync,
{
    /// Validate the inputs and store them (state: *configured*).
    pub fn new(sde: &'a Sde<Mu, Sig>, time: &TimeSpec, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let grid = time.build()?;
        Ok(OneFactorSimulation { sde, grid, config })
    }

    /// Launch the selected kernels and materialise the ensemble.
    pub fn run(&self) -> SimResult<Ensemble> {
        let columns = self.grid.step_count() + 1;
        let buffer = match self.config.target {
            Target::Cpu => self.run_cpu(columns)?,
            Target::Batch => match self.config.scheme {
                Scheme::Euler => {
                    batch::euler_one_factor(self.sde, &self.grid, self.config.iterations)?
                }
                Scheme::Milstein => batch::milstein_one_factor(
                    self.sde,
                    &self.grid,
                    self.config.derivative_step,
                    self.config.iterations,
                )?,
            },
        };
        Ok(Ensemble::from_flat(
            self.config.iterations,
            columns,
            buffer,
        ))
    }

    fn run_cpu(&self, columns: usize) -> SimResult<Vec<f64>> {
        let iterations = self.config.iterations;
        let seeds = rng::path_seeds(self.config.seed, iterations);
        let h = self.config.derivative_step;
        let scheme = self.config.scheme;
        let delta = self.grid.uniform_delta();
        let points = self.grid.explicit_points();

        let mut buffer = vec![0.0f64; iterations * columns];
        let failures: Vec<(usize, StepFailure)> = buffer
            .par_chunks_mut(columns)
            .zip(seeds.par_iter())
            .enumerate()
            .filter_map(|(lane, (row, seed))| {
                let mut path_rng = rng::seed_rng_from_u64(*seed);
                let result = match (scheme, delta) {
                    (Scheme::Euler, Some(delta)) => {
                        euler_maruyama::sample_path_uniform(self.sde, delta, row, &mut path_rng)
                    }
                    (Scheme::Euler, None) => euler_maruyama::sample_path_with_points(
                        self.sde,
                        points.unwrap_or(&[]),
                        row,
                        &mut path_rng,
                    ),
                    (Scheme::Milstein, Some(delta)) => {
                        milstein::sample_path_uniform(self.sde, delta, h, row, &mut path_rng)
                    }
                    (Scheme::Milstein, None) => milstein::sample_path_with_points(
                        self.sde,
                        points.unwrap_or(&[]),
                        h,
                        row,
                        &mut path_rng,
                    ),
                };
                result.err().map(|failure| (lane, failure))
            })
            .collect();

        first_failure(failures)?;
        Ok(buffer)
    }
}

/// A configured two-factor simulation with correlated Brownian drivers.
pub struct TwoFactorSimulation<'a, Mu1, Sig1, Mu2, Sig2>
where
    Mu1: Fn(f64, f64, f64) -> f64 + Sync,
    Sig1: Fn(f64, f64, f64) -> f64 + Sync,
    Mu2: Fn(f64, f64, f64) -> f64 + Sync,
    Sig2: Fn(f64, f64, f64) -> f64 + Sync,
{
    sde: &'a TwoFactorSde<Mu1, Sig1, Mu2, Sig2>,
    correlation: f64,
    grid: TimeGrid,
    config: SimConfig,
}

impl<'a, Mu1, Sig1, Mu2, Sig2> TwoFactorSimulation<'a, Mu1, Sig1, Mu2, Sig2>
where
    Mu1: Fn(f64, f64, f64) -> f64 + Sync,
    Sig1: Fn(f64, f64, f64) -> f64 + Sync,
    Mu2: Fn(f64, f64, f64) -> f64 + Sync,
    Sig2: Fn(f64, f64, f64) -> f64 + Sync,
{
    /// Validate the inputs and store them (state: *configured*).
    pub fn new(
        sde: &'a TwoFactorSde<Mu1, Sig1, Mu2, Sig2>,
        correlation: f64,
        time: &TimeSpec,
        config: SimConfig,
    ) -> SimResult<Self> {
        config.validate()?;
        validate_correlation(correlation)?;
        let grid = time.build()?;
        Ok(TwoFactorSimulation {
            sde,
            correlation,
            grid,
            config,
        })
    }

    /// Launch the selected kernels and materialise the factor-1 ensemble.
    ///
    /// The CPU target has no two-factor kernels and reports
    /// `NotImplemented`; use `Target::Batch`.
    pub fn run(&self) -> SimResult<Ensemble> {
        let columns = self.grid.step_count() + 1;
        let buffer = match self.config.target {
            Target::Cpu => {
                return Err(SimError::NotImplemented {
                    operation: "two-factor path simulation on the CPU target".to_string(),
                })
            }
            Target::Batch => match self.config.scheme {
                Scheme::Euler => batch::euler_two_factor(
                    self.sde,
                    self.correlation,
                    &self.grid,
                    self.config.iterations,
                )?,
                Scheme::Milstein => batch::milstein_two_factor(
                    self.sde,
                    self.correlation,
                    &self.grid,
                    self.config.derivative_step,
                    self.config.iterations,
                )?,
            },
        };
        Ok(Ensemble::from_flat(
            self.config.iterations,
            columns,
            buffer,
        ))
    }
}

/// Configure and run a one-factor simulation in one call.
pub fn simulate<Mu, Sig>(
    sde: &Sde<Mu, Sig>,
    time: &TimeSpec,
    config: &SimConfig,
) -> SimResult<Ensemble>
where
    Mu: Fn(f64, f64) -> f64 + Sync,
    Sig: Fn(f64, f64) -> f64 + Sync,
{
    OneFactorSimulation::new(sde, time, config.clone())?.run()
}

/// Configure and run a two-factor simulation in one call.
pub fn simulate_two_factor<Mu1, Sig1, Mu2, Sig2>(
    sde: &TwoFactorSde<Mu1, Sig1, Mu2, Sig2>,
    correlation: f64,
    time: &TimeSpec,
    config: &SimConfig,
) -> SimResult<Ensemble>
where
    Mu1: Fn(f64, f64, f64) -> f64 + Sync,
    Sig1: Fn(f64, f64, f64) -> f64 + Sync,
    Mu2: Fn(f64, f64, f64) -> f64 + Sync,
    Sig2: Fn(f64, f64, f64) -> f64 + Sync,
{
    TwoFactorSimulation::new(sde, correlation, time, config.clone())?.run()
}
