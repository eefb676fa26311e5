// src/grid.rs
//! Time Discretisation
//!
//! A simulation advances over the ordered time points `t0 = 0, t1, …, tN`.
//! Uniform grids are stored compactly as `(T, N, Δ)`, with the points never
//! materialised unless a caller asks for them; explicit grids keep
//! the validated point sequence and expose per-step increments.

use crate::error::{SimError, SimResult};

/// Caller-facing time specification.
#[derive(Debug, Clone)]
pub enum TimeSpec {
    /// Uniform grid: horizon `T > 0` split into `N ≥ 1` equal steps.
    Uniform { horizon: f64, steps: usize },
    /// Explicit ordered time points starting at 0.
    Points(Vec<f64>),
}

impl TimeSpec {
    /// Validate into a [`TimeGrid`].
    pub fn build(&self) -> SimResult<TimeGrid> {
        match self {
            TimeSpec::Uniform { horizon, steps } => TimeGrid::uniform(*horizon, *steps),
            TimeSpec::Points(points) => TimeGrid::from_points(points.clone()),
        }
    }
}

/// Validated time grid consumed by the kernels.
#[derive(Debug, Clone)]
pub enum TimeGrid {
    /// Constant step `delta = horizon / steps`.
    Uniform {
        horizon: f64,
        steps: usize,
        delta: f64,
    },
    /// Strictly increasing points `t0 = 0, …, tN`.
    Explicit { points: Vec<f64> },
}

impl TimeGrid {
    /// Uniform grid over `[0, horizon]` with `steps` equal increments.
    pub fn uniform(horizon: f64, steps: usize) -> SimResult<Self> {
        if !horizon.is_finite() || horizon <= 0.0 {
            return Err(SimError::InvalidTimeGrid {
                reason: format!("horizon {} must be positive and finite", horizon),
            });
        }
        if steps == 0 {
            return Err(SimError::InvalidTimeGrid {
                reason: "step count must be at least 1".to_string(),
            });
        }
        Ok(TimeGrid::Uniform {
            horizon,
            steps,
            delta: horizon / steps as f64,
        })
    }

    /// Explicit grid from an ordered point sequence.
    pub fn from_points(points: Vec<f64>) -> SimResult<Self> {
        if points.len() < 2 {
            return Err(SimError::InvalidTimeGrid {
                reason: format!("need at least 2 time points, got {}", points.len()),
            });
        }
        if points[0] != 0.0 {
            return Err(SimError::InvalidTimeGrid {
                reason: format!("first time point must be 0, got {}", points[0]),
            });
        }
        for window in points.windows(2) {
            if !window[1].is_finite() {
                return Err(SimError::InvalidTimeGrid {
                    reason: format!("time point {} is not finite", window[1]),
                });
            }
            if window[1] <= window[0] {
                return Err(SimError::InvalidTimeGrid {
                    reason: format!(
                        "time points must be strictly increasing, got {} after {}",
                        window[1], window[0]
                    ),
                });
            }
        }
        Ok(TimeGrid::Explicit { points })
    }

    /// Number of steps `N`; paths hold `N + 1` values.
    #[inline]
    pub fn step_count(&self) -> usize {
        match self {
            TimeGrid::Uniform { steps, .. } => *steps,
            TimeGrid::Explicit { points } => points.len() - 1,
        }
    }

    /// Time point `t_k`.
    #[inline]
    pub fn time(&self, k: usize) -> f64 {
        match self {
            TimeGrid::Uniform { delta, .. } => *delta * k as f64,
            TimeGrid::Explicit { points } => points[k],
        }
    }

    /// Step width `Δ_k = t_{k+1} - t_k`.
    #[inline]
    pub fn dt(&self, k: usize) -> f64 {
        match self {
            TimeGrid::Uniform { delta, .. } => *delta,
            TimeGrid::Explicit { points } => points[k + 1] - points[k],
        }
    }

    /// Terminal time `tN`.
    pub fn horizon(&self) -> f64 {
        match self {
            TimeGrid::Uniform { horizon, .. } => *horizon,
            TimeGrid::Explicit { points } => *points.last().unwrap(),
        }
    }

    /// Uniform step width, if this is a uniform grid.
    pub fn uniform_delta(&self) -> Option<f64> {
        match self {
            TimeGrid::Uniform { delta, .. } => Some(*delta),
            TimeGrid::Explicit { .. } => None,
        }
    }

    /// Explicit point slice, if this is an explicit grid.
    pub fn explicit_points(&self) -> Option<&[f64]> {
        match self {
            TimeGrid::Uniform { .. } => None,
            TimeGrid::Explicit { points } => Some(points),
        }
    }

    /// Materialise the full point sequence `Δ·i` / `t_i`.
    pub fn points(&self) -> Vec<f64> {
        match self {
            TimeGrid::Uniform { steps, delta, .. } => {
                (0..=*steps).map(|i| delta * i as f64).collect()
            }
            TimeGrid::Explicit { points } => points.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn test_uniform_grid() {
        let grid = TimeGrid::uniform(1.0, 4).unwrap();
        assert_eq!(grid.step_count(), 4);
        assert_eq!(grid.time(0), 0.0);
        assert_eq!(grid.time(4), 1.0);
        assert_eq!(grid.dt(2), 0.25);
        assert_eq!(grid.horizon(), 1.0);
        assert_eq!(grid.points(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(grid.uniform_delta(), Some(0.25));
    }

    #[test]
    fn test_uniform_grid_rejects_bad_inputs() {
        assert!(TimeGrid::uniform(0.0, 10).is_err());
        assert!(TimeGrid::uniform(-1.0, 10).is_err());
        assert!(TimeGrid::uniform(f64::NAN, 10).is_err());
        assert!(TimeGrid::uniform(1.0, 0).is_err());
    }

    #[test]
    fn test_explicit_grid() {
        let grid = TimeGrid::from_points(vec![0.0, 0.1, 0.4, 1.0]).unwrap();
        assert_eq!(grid.step_count(), 3);
        assert_eq!(grid.time(1), 0.1);
        assert!((grid.dt(1) - 0.3).abs() < 1e-15);
        assert_eq!(grid.horizon(), 1.0);
        assert!(grid.uniform_delta().is_none());
    }

    #[test]
    fn test_explicit_grid_must_be_increasing() {
        let err = TimeGrid::from_points(vec![0.0, 0.2, 0.1]).unwrap_err();
        assert!(matches!(err, SimError::InvalidTimeGrid { .. }));
    }

    #[test]
    fn test_explicit_grid_must_start_at_zero() {
        assert!(TimeGrid::from_points(vec![0.1, 0.2, 0.3]).is_err());
        assert!(TimeGrid::from_points(vec![0.0]).is_err());
        assert!(TimeGrid::from_points(vec![0.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_time_spec_build() {
        let spec = TimeSpec::Uniform {
            horizon: 2.0,
            steps: 8,
        };
        assert_eq!(spec.build().unwrap().step_count(), 8);

        let spec = TimeSpec::Points(vec![0.0, 1.0, 2.0]);
        assert_eq!(spec.build().unwrap().step_count(), 2);
    }
}
