//! Regression estimators used inside iterative imputation.
//!
//! The imputer only needs something it can fit on a design matrix and ask
//! for predictions, so the seam is a small trait. [`RidgeRegressor`] is the
//! estimator shipped with the crate; any other implementation can be plugged
//! into [`IterativeImputer`](crate::preprocessing::IterativeImputer).

pub mod ridge;

pub use ridge::{LinearParams, RidgeConfig, RidgeRegressor};

use crate::preprocessing::error::Result;
use ndarray::{Array1, Array2};

/// A regressor that can be fit repeatedly on `(x, y)` and queried afterwards.
///
/// `Clone` is required: the imputer takes a fresh copy of the prototype for
/// every column of every round and keeps each fitted copy.
pub trait Regressor: Clone {
    /// Fit on `x` (rows = samples) against targets `y`.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Predict one value per row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}
