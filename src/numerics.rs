// src/numerics.rs

/// Default step for numerical differentiation of diffusion coefficients.
///
/// Conservative central-difference step; callers may override it per
/// simulation through `SimConfig::derivative_step`.
pub const DEFAULT_DERIVATIVE_STEP: f64 = 1e-5;

/// Central finite difference of `f` at `x` with step `h`:
///
/// ```text
/// f'(x) ≈ (f(x + h/2) - f(x - h/2)) / h
/// ```
///
/// Used by the Milstein kernels to differentiate black-box diffusion
/// closures; the same closure that produces the diffusion term is passed
/// here, so no separate derivative definition can drift out of sync.
#[inline]
pub fn central_difference<F: Fn(f64) -> f64>(f: F, x: f64, h: f64) -> f64 {
    (f(x + 0.5 * h) - f(x - 0.5 * h)) / h
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = std::time::Instant::now();
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Timer::new()
    }
}
