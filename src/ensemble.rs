// src/ensemble.rs
//! Simulation Result Collection
//!
//! An `Ensemble` is the rectangular `M × (N+1)` collection of factor-1
//! sample paths produced by one simulation, stored row-major so that each
//! path is a contiguous row. Column 0 holds the initial condition
//! bit-exactly for every row; rows follow launch order.
//!
//! Payoff consumers iterate rows and reduce them to scalars; the engine
//! itself never evaluates payoffs.

use ndarray::{Array2, ArrayView1, Axis};

#[derive(Debug, Clone)]
pub struct Ensemble {
    data: Array2<f64>,
}

impl Ensemble {
    /// Wrap a row-major flat buffer of `iterations * (steps + 1)` values.
    pub(crate) fn from_flat(iterations: usize, columns: usize, buffer: Vec<f64>) -> Self {
        let data = Array2::from_shape_vec((iterations, columns), buffer)
            .expect("buffer length matches ensemble shape");
        Ensemble { data }
    }

    /// Number of simulated paths `M`.
    pub fn iterations(&self) -> usize {
        self.data.nrows()
    }

    /// Number of time steps `N`; every path holds `N + 1` values.
    pub fn step_count(&self) -> usize {
        self.data.ncols() - 1
    }

    /// One path as a row view.
    pub fn path(&self, i: usize) -> ArrayView1<'_, f64> {
        self.data.row(i)
    }

    /// Iterate paths in launch order.
    pub fn paths<'a>(&'a self) -> impl Iterator<Item = ArrayView1<'a, f64>> + 'a {
        self.data.outer_iter()
    }

    /// Value of path `i` at time index `k`.
    pub fn value(&self, i: usize, k: usize) -> f64 {
        self.data[(i, k)]
    }

    /// Terminal value of every path, in launch order.
    pub fn terminal_values(&self) -> Vec<f64> {
        self.data
            .index_axis(Axis(1), self.data.ncols() - 1)
            .to_vec()
    }

    /// The underlying `M × (N+1)` array.
    pub fn into_array(self) -> Array2<f64> {
        self.data
    }

    /// Borrow the underlying array.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }
}
