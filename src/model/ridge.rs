use super::Regressor;
use crate::preprocessing::error::{PreprocessingError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Hyperparameters of [`RidgeRegressor`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RidgeConfig {
    /// L2 penalty on the weights. The intercept is not penalised.
    pub alpha: f64,
}

impl Default for RidgeConfig {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}

impl RidgeConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(PreprocessingError::InvalidParameter(format!(
                "alpha must be finite and >= 0, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

/// Learned weights and intercept.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    pub weights: Array1<f64>,
    pub bias: f64,
}

/// L2-regularised least squares with an intercept.
///
/// Solves `(Xc^T Xc + alpha I) w = Xc^T yc` on centred data, then recovers
/// the intercept from the means.
///
/// # Example
/// ```ignore
/// use tabprep::model::{Regressor, RidgeRegressor};
///
/// let mut model = RidgeRegressor::new().with_alpha(0.1);
/// model.fit(&x, &y)?;
/// let y_hat = model.predict(&x)?;
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RidgeRegressor {
    config: RidgeConfig,
    params: Option<LinearParams>,
}

impl RidgeRegressor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: RidgeConfig) -> Self {
        Self {
            config,
            params: None,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.config.alpha = alpha;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.config.alpha
    }

    /// Fitted parameters, `None` before `fit`.
    pub fn params(&self) -> Option<&LinearParams> {
        self.params.as_ref()
    }
}

impl Regressor for RidgeRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.config.validate()?;
        let (n_samples, n_features) = x.dim();
        if n_samples != y.len() {
            return Err(PreprocessingError::ShapeMismatch {
                expected: format!("{} targets", n_samples),
                got: format!("{} targets", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit RidgeRegressor on zero samples".to_string(),
            ));
        }

        let x_mean = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(n_features));
        let y_mean = y.mean().unwrap_or(0.0);
        let xc = x - &x_mean;
        let yc = y - y_mean;

        let mut gram = xc.t().dot(&xc);
        for i in 0..n_features {
            gram[[i, i]] += self.config.alpha;
        }
        let rhs = xc.t().dot(&yc);
        let weights = solve(gram, rhs)?;
        let bias = y_mean - x_mean.dot(&weights);

        self.params = Some(LinearParams { weights, bias });
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let params = self.params.as_ref().ok_or_else(|| {
            PreprocessingError::InvalidParameter("RidgeRegressor used before fit".to_string())
        })?;
        if x.ncols() != params.weights.len() {
            return Err(PreprocessingError::ShapeMismatch {
                expected: format!("{} features", params.weights.len()),
                got: format!("{} features", x.ncols()),
            });
        }
        Ok(x.dot(&params.weights) + params.bias)
    }
}

/// Solve `a x = b` by Gaussian elimination with partial pivoting.
///
/// A pivot counts as zero relative to its own column's original diagonal.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>> {
    let n = b.len();
    let column_scale: Vec<f64> = (0..n).map(|k| a[[k, k]].abs()).collect();

    for k in 0..n {
        let pivot = (k..n)
            .max_by(|&i, &j| a[[i, k]].abs().total_cmp(&a[[j, k]].abs()))
            .unwrap_or(k);
        if a[[pivot, k]].abs() <= column_scale[k] * 1e-12 {
            return Err(PreprocessingError::NumericalError(format!(
                "singular system at column {}",
                k
            )));
        }
        if pivot != k {
            for j in 0..n {
                a.swap([k, j], [pivot, j]);
            }
            b.swap(k, pivot);
        }
        for i in (k + 1)..n {
            let factor = a[[i, k]] / a[[k, k]];
            if factor == 0.0 {
                continue;
            }
            for j in k..n {
                a[[i, j]] -= factor * a[[k, j]];
            }
            b[i] -= factor * b[k];
        }
    }

    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let tail: f64 = ((i + 1)..n).map(|j| a[[i, j]] * x[j]).sum();
        x[i] = (b[i] - tail) / a[[i, i]];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_ridge_recovers_line_without_penalty() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![3.0, 5.0, 7.0, 9.0];
        let mut model = RidgeRegressor::new().with_alpha(0.0);
        model.fit(&x, &y).unwrap();

        let params = model.params().unwrap();
        assert!((params.weights[0] - 2.0).abs() < 1e-9);
        assert!((params.bias - 1.0).abs() < 1e-9);

        let pred = model.predict(&array![[10.0]]).unwrap();
        assert!((pred[0] - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_ridge_two_features() {
        let x = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [2.0, 1.0], [0.0, 3.0]];
        let y = x.column(0).mapv(|v| 3.0 * v) + x.column(1).mapv(|v| -1.0 * v) + 0.5;
        let mut model = RidgeRegressor::new().with_alpha(0.0);
        model.fit(&x, &y).unwrap();
        let pred = model.predict(&x).unwrap();
        for (p, t) in pred.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-9);
        }
    }

    #[test]
    fn test_ridge_penalty_shrinks_weights() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];
        let mut plain = RidgeRegressor::new().with_alpha(0.0);
        let mut shrunk = RidgeRegressor::new().with_alpha(10.0);
        plain.fit(&x, &y).unwrap();
        shrunk.fit(&x, &y).unwrap();
        assert!(shrunk.params().unwrap().weights[0] < plain.params().unwrap().weights[0]);
    }

    #[test]
    fn test_ridge_default_alpha() {
        assert_eq!(RidgeRegressor::new().alpha(), 1.0);
    }

    #[test]
    fn test_ridge_singular_without_penalty() {
        // Two identical features with alpha = 0.
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let y = array![1.0, 2.0, 3.0];
        let mut model = RidgeRegressor::new().with_alpha(0.0);
        assert!(matches!(
            model.fit(&x, &y),
            Err(PreprocessingError::NumericalError(_))
        ));

        let mut ridge = RidgeRegressor::new();
        assert!(ridge.fit(&x, &y).is_ok());
    }

    #[test]
    fn test_ridge_constant_feature_beside_large_feature() {
        let x = Array2::from_shape_fn((1000, 2), |(i, j)| {
            if j == 0 {
                50_000.0 + 120.0 * i as f64
            } else {
                1.0
            }
        });
        let y = x.column(0).mapv(|v| v * 1e-3 + 2.0);
        let mut model = RidgeRegressor::new();
        model.fit(&x, &y).unwrap();

        let params = model.params().unwrap();
        assert!(params.weights[1].abs() < 1e-9);
        let pred = model.predict(&x).unwrap();
        for (p, t) in pred.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ridge_zero_features_predicts_mean() {
        let x = Array2::<f64>::zeros((3, 0));
        let y = array![1.0, 2.0, 6.0];
        let mut model = RidgeRegressor::new();
        model.fit(&x, &y).unwrap();
        let pred = model.predict(&Array2::zeros((2, 0))).unwrap();
        assert!(pred.iter().all(|p| (p - 3.0).abs() < 1e-12));
    }

    #[test]
    fn test_ridge_invalid_alpha() {
        let x = array![[1.0]];
        let y = array![1.0];
        for alpha in [-1.0, f64::NAN, f64::INFINITY] {
            let mut model = RidgeRegressor::new().with_alpha(alpha);
            assert!(matches!(
                model.fit(&x, &y),
                Err(PreprocessingError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_ridge_predict_before_fit() {
        let model = RidgeRegressor::new();
        assert!(model.predict(&array![[1.0]]).is_err());
    }

    #[test]
    fn test_ridge_shape_checks() {
        let mut model = RidgeRegressor::new();
        assert!(matches!(
            model.fit(&array![[1.0], [2.0]], &array![1.0]),
            Err(PreprocessingError::ShapeMismatch { .. })
        ));
        model.fit(&array![[1.0], [2.0]], &array![1.0, 2.0]).unwrap();
        assert!(matches!(
            model.predict(&array![[1.0, 2.0]]),
            Err(PreprocessingError::ShapeMismatch { .. })
        ));
    }
}
