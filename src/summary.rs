// src/summary.rs
//! Ensemble Summary Statistics
//!
//! Small reductions over simulation results, used by the demos and the
//! statistical tests. Payoff evaluation itself lives outside the engine;
//! these helpers only describe the sample.

use crate::ensemble::Ensemble;
use statrs::statistics::Statistics;

/// Sample mean of the terminal values.
pub fn terminal_mean(ensemble: &Ensemble) -> f64 {
    ensemble.terminal_values().mean()
}

/// Standard error of the mean, `σ̂ / √N`.
///
/// The Monte Carlo error bar: it decreases as `1/√N`, so halving it
/// costs four times the paths.
pub fn standard_error(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n <= 1.0 {
        return 0.0;
    }
    (values.variance() / n).sqrt()
}

/// Pearson correlation of two equal-length samples.
pub fn sample_correlation(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "samples must have equal length");
    let mean_a = a.mean();
    let mean_b = b.mean();

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    cov / (var_a.sqrt() * var_b.sqrt())
}

/// Analytic terminal mean of GBM, `x0 · exp(μT)`.
pub fn gbm_terminal_mean(x0: f64, mu: f64, t: f64) -> f64 {
    x0 * (mu * t).exp()
}

/// Analytic terminal variance of ABM, `σ²T`.
pub fn abm_terminal_variance(sigma: f64, t: f64) -> f64 {
    sigma * sigma * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_error_scaling() {
        let values: Vec<f64> = (0..100).map(|i| (i % 2) as f64).collect();
        let se_100 = standard_error(&values);

        let values: Vec<f64> = (0..400).map(|i| (i % 2) as f64).collect();
        let se_400 = standard_error(&values);

        // Same sample variance, 4x the points → half the standard error
        assert!((se_100 / se_400 - 2.0).abs() < 0.02);
        assert_eq!(standard_error(&[1.0]), 0.0);
    }

    #[test]
    fn test_sample_correlation_limits() {
        let a: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let b: Vec<f64> = a.iter().map(|x| 2.0 * x + 1.0).collect();
        let c: Vec<f64> = a.iter().map(|x| -x).collect();

        assert!((sample_correlation(&a, &b) - 1.0).abs() < 1e-12);
        assert!((sample_correlation(&a, &c) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reference_moments() {
        assert!((gbm_terminal_mean(100.0, 0.05, 1.0) - 100.0 * 0.05_f64.exp()).abs() < 1e-12);
        assert_eq!(abm_terminal_variance(1.0, 1.0), 1.0);
    }
}
