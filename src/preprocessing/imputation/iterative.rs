//! Multivariate iterative imputation.
//!
//! Each feature with missing values is modelled as a function of all other
//! features, round-robin, for a bounded number of rounds. The imputer is fit
//! once on a training partition; the fitted model is then replayed on any
//! partition with the same columns, so train and test are imputed
//! consistently and the test partition never influences the model.
//!
//! # Algorithm
//! 1. Fill missing cells with a [`SimpleImputer`] statistic (mean by default).
//! 2. For each round and each column in [`ImputationOrder`], fit a fresh
//!    clone of the estimator on the rows where that column is observed,
//!    using every other column as predictors, and overwrite the originally
//!    missing cells with its predictions.
//! 3. Stop when `max |X_t - X_{t-1}| < tol * max |observed value|` or after
//!    `max_iter` rounds.
//!
//! # Example
//! ```ignore
//! use tabprep::preprocessing::{FittedTransformer, IterativeImputer, Transformer};
//!
//! let fitted = IterativeImputer::new().with_max_iter(10).with_tol(1e-3).fit(&train)?;
//! let train_filled = fitted.transform(&train)?;
//! let test_filled = fitted.transform(&test)?;
//! ```

use super::simple::{FittedSimpleImputer, ImputeStrategy, SimpleImputer};
use crate::dataset::DataFrame;
use crate::model::{Regressor, RidgeRegressor};
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Order in which columns are visited within a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationOrder {
    /// Fewest missing values first.
    #[default]
    Ascending,
    /// Most missing values first.
    Descending,
    /// Left to right.
    Roman,
}

/// Hyperparameters of [`IterativeImputer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IterativeImputerConfig {
    /// Maximum number of rounds. `0` means initial fill only.
    pub max_iter: usize,
    /// Relative convergence tolerance.
    pub tol: f64,
    /// Strategy of the initial fill.
    pub initial_strategy: ImputeStrategy,
    pub imputation_order: ImputationOrder,
    /// Lower clip for imputed values.
    pub min_value: Option<f64>,
    /// Upper clip for imputed values.
    pub max_value: Option<f64>,
}

impl Default for IterativeImputerConfig {
    fn default() -> Self {
        Self {
            max_iter: 10,
            tol: 1e-3,
            initial_strategy: ImputeStrategy::Mean,
            imputation_order: ImputationOrder::Ascending,
            min_value: None,
            max_value: None,
        }
    }
}

impl IterativeImputerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.tol.is_finite() || self.tol < 0.0 {
            return Err(PreprocessingError::InvalidParameter(format!(
                "tolerance must be finite and >= 0, got {}",
                self.tol
            )));
        }
        if let (Some(lo), Some(hi)) = (self.min_value, self.max_value) {
            if lo > hi {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "min_value {} is greater than max_value {}",
                    lo, hi
                )));
            }
        }
        Ok(())
    }

    fn clip(&self, v: f64) -> f64 {
        let v = self.min_value.map_or(v, |lo| v.max(lo));
        self.max_value.map_or(v, |hi| v.min(hi))
    }
}

/// IterativeImputer transformer (unfitted).
///
/// Generic over the per-column estimator; defaults to [`RidgeRegressor`].
#[derive(Clone, Debug)]
pub struct IterativeImputer<R: Regressor = RidgeRegressor> {
    estimator: R,
    config: IterativeImputerConfig,
}

impl IterativeImputer<RidgeRegressor> {
    /// Create an imputer using a default [`RidgeRegressor`].
    pub fn new() -> Self {
        Self::with_estimator(RidgeRegressor::new())
    }
}

impl Default for IterativeImputer<RidgeRegressor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Regressor> IterativeImputer<R> {
    /// Create an imputer around a prototype estimator.
    pub fn with_estimator(estimator: R) -> Self {
        Self {
            estimator,
            config: IterativeImputerConfig::default(),
        }
    }

    pub fn from_config(estimator: R, config: IterativeImputerConfig) -> Self {
        Self { estimator, config }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.config.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.config.tol = tol;
        self
    }

    pub fn with_initial_strategy(mut self, strategy: ImputeStrategy) -> Self {
        self.config.initial_strategy = strategy;
        self
    }

    pub fn with_imputation_order(mut self, order: ImputationOrder) -> Self {
        self.config.imputation_order = order;
        self
    }

    pub fn with_min_value(mut self, min_value: f64) -> Self {
        self.config.min_value = Some(min_value);
        self
    }

    pub fn with_max_value(mut self, max_value: f64) -> Self {
        self.config.max_value = Some(max_value);
        self
    }

    pub fn config(&self) -> &IterativeImputerConfig {
        &self.config
    }

    /// Columns with at least one observed value, in visiting order.
    fn visiting_order(&self, missing: &Array2<bool>) -> Vec<usize> {
        let n_rows = missing.nrows();
        let counts: Vec<usize> = missing
            .columns()
            .into_iter()
            .map(|c| c.iter().filter(|&&m| m).count())
            .collect();
        let mut order: Vec<usize> = (0..counts.len()).filter(|&j| counts[j] < n_rows).collect();
        match self.config.imputation_order {
            ImputationOrder::Roman => {}
            ImputationOrder::Ascending => order.sort_by_key(|&j| counts[j]),
            ImputationOrder::Descending => order.sort_by_key(|&j| std::cmp::Reverse(counts[j])),
        }
        order
    }
}

/// One fitted estimator and the column it predicts.
#[derive(Clone, Debug)]
pub struct ImputationStep<R> {
    column: usize,
    name: String,
    estimator: R,
}

impl<R> ImputationStep<R> {
    /// Name of the predicted column.
    pub fn column(&self) -> &str {
        &self.name
    }

    pub fn estimator(&self) -> &R {
        &self.estimator
    }
}

/// Fitted IterativeImputer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedIterativeImputer<R: Regressor = RidgeRegressor> {
    config: IterativeImputerConfig,
    columns: Vec<String>,
    initial: FittedSimpleImputer,
    steps: Vec<ImputationStep<R>>,
    n_iter: usize,
    converged: bool,
}

impl<R: Regressor> FittedIterativeImputer<R> {
    /// Number of rounds performed during fit.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Whether fit stopped on the tolerance rather than on `max_iter`.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Every (column, estimator) pair fit, in order.
    pub fn steps(&self) -> &[ImputationStep<R>] {
        &self.steps
    }

    /// Statistics of the initial fill.
    pub fn initial_imputer(&self) -> &FittedSimpleImputer {
        &self.initial
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn check_columns(&self, data: &DataFrame) -> Result<()> {
        let names = data.column_names();
        if names != self.columns {
            return Err(PreprocessingError::ColumnMismatch {
                expected: self.columns.clone(),
                got: names.into_iter().map(String::from).collect(),
            });
        }
        Ok(())
    }
}

fn missing_mask(x: &Array2<f64>) -> Array2<bool> {
    x.mapv(f64::is_nan)
}

/// Row indices where `column` is (or is not) missing.
fn rows_where(missing: &Array2<bool>, column: usize, is_missing: bool) -> Vec<usize> {
    missing
        .column(column)
        .iter()
        .enumerate()
        .filter_map(|(i, &m)| (m == is_missing).then_some(i))
        .collect()
}

/// `x[rows, all columns except column]`.
fn predictors(x: &Array2<f64>, rows: &[usize], column: usize) -> Array2<f64> {
    let others: Vec<usize> = (0..x.ncols()).filter(|&j| j != column).collect();
    x.select(Axis(0), rows).select(Axis(1), &others)
}

/// Predict the missing rows of one column and write them back into `x`.
fn impute_column<R: Regressor>(
    x: &mut Array2<f64>,
    rows: &[usize],
    column: usize,
    estimator: &R,
    config: &IterativeImputerConfig,
) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let predicted = estimator.predict(&predictors(x, rows, column))?;
    for (&row, &value) in rows.iter().zip(predicted.iter()) {
        x[[row, column]] = config.clip(value);
    }
    Ok(())
}

impl<R: Regressor> Transformer for IterativeImputer<R> {
    type Input = DataFrame;
    type Output = DataFrame;
    type Fitted = FittedIterativeImputer<R>;

    fn fit(&self, data: &DataFrame) -> Result<FittedIterativeImputer<R>> {
        self.config.validate()?;
        if data.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit IterativeImputer on empty data".to_string(),
            ));
        }

        let mut x = data.to_array()?;
        let missing = missing_mask(&x);
        let max_abs = x
            .iter()
            .filter(|v| !v.is_nan())
            .fold(0.0_f64, |m, v| m.max(v.abs()));
        let threshold = self.config.tol * max_abs;

        let initial = SimpleImputer::new(self.config.initial_strategy).fit(data)?;
        initial.fill_array(&mut x)?;

        let order = self.visiting_order(&missing);
        let names = data.column_names();
        let mut steps = Vec::with_capacity(order.len() * self.config.max_iter);
        let mut n_iter = 0;
        let mut converged = false;

        for round in 1..=self.config.max_iter {
            let previous = x.clone();
            for &j in &order {
                let observed = rows_where(&missing, j, false);
                let target: Array1<f64> = observed.iter().map(|&i| x[[i, j]]).collect();
                let mut estimator = self.estimator.clone();
                estimator.fit(&predictors(&x, &observed, j), &target)?;

                impute_column(
                    &mut x,
                    &rows_where(&missing, j, true),
                    j,
                    &estimator,
                    &self.config,
                )?;
                steps.push(ImputationStep {
                    column: j,
                    name: names[j].to_string(),
                    estimator,
                });
            }

            n_iter = round;
            let change = (&x - &previous)
                .iter()
                .fold(0.0_f64, |m, v| m.max(v.abs()));
            tracing::debug!(round, change, threshold, "Imputation round");
            if change < threshold {
                converged = true;
                break;
            }
        }

        if self.config.max_iter > 0 && !converged {
            tracing::warn!(
                max_iter = self.config.max_iter,
                "IterativeImputer reached max_iter without converging"
            );
        }

        Ok(FittedIterativeImputer {
            config: self.config.clone(),
            columns: names.into_iter().map(String::from).collect(),
            initial,
            steps,
            n_iter,
            converged,
        })
    }
}

impl<R: Regressor> FittedTransformer for FittedIterativeImputer<R> {
    type Input = DataFrame;
    type Output = DataFrame;

    /// Replay the fitted estimators, writing only into cells that are
    /// missing in `data`.
    fn transform(&self, data: &DataFrame) -> Result<DataFrame> {
        self.check_columns(data)?;
        let mut x = data.to_array()?;
        let missing = missing_mask(&x);
        self.initial.fill_array(&mut x)?;

        for step in &self.steps {
            let rows = rows_where(&missing, step.column, true);
            impute_column(&mut x, &rows, step.column, &step.estimator, &self.config)?;
        }

        DataFrame::from_array(&self.columns, &x)
    }

    fn inverse_transform(&self, _data: &DataFrame) -> Result<DataFrame> {
        Err(PreprocessingError::InvalidParameter(
            "IterativeImputer does not support inverse_transform (missing value information is lost)"
                .to_string(),
        ))
    }

    fn n_features_in(&self) -> usize {
        self.columns.len()
    }
}

/// Impute `train` and `test` with one imputer fit on `train` only, using a
/// default [`RidgeRegressor`] per column.
///
/// # Errors
/// - [`PreprocessingError::ColumnMismatch`] if the frames differ in columns
///   or column order.
/// - [`PreprocessingError::TypeMismatch`] if a column is not numeric.
/// - [`PreprocessingError::EmptyData`] if `train` has no rows.
/// - [`PreprocessingError::InvalidParameter`] for a negative or non-finite
///   `tolerance`.
pub fn impute(
    train: &DataFrame,
    test: &DataFrame,
    max_iterations: usize,
    tolerance: f64,
) -> Result<(DataFrame, DataFrame)> {
    impute_with(RidgeRegressor::new(), train, test, max_iterations, tolerance)
}

/// Like [`impute`], with a caller-supplied estimator prototype.
pub fn impute_with<R: Regressor>(
    estimator: R,
    train: &DataFrame,
    test: &DataFrame,
    max_iterations: usize,
    tolerance: f64,
) -> Result<(DataFrame, DataFrame)> {
    let imputer = IterativeImputer::with_estimator(estimator)
        .with_max_iter(max_iterations)
        .with_tol(tolerance);
    impute_pair(&imputer, train, test)
}

/// Fit `imputer` on `train` and apply it to both partitions.
pub fn impute_pair<R: Regressor>(
    imputer: &IterativeImputer<R>,
    train: &DataFrame,
    test: &DataFrame,
) -> Result<(DataFrame, DataFrame)> {
    if train.column_names() != test.column_names() {
        return Err(PreprocessingError::ColumnMismatch {
            expected: train.column_names().into_iter().map(String::from).collect(),
            got: test.column_names().into_iter().map(String::from).collect(),
        });
    }

    let fitted = imputer.fit(train)?;
    let train_out = fitted.transform(train)?;
    let test_out = fitted.transform(test)?;
    tracing::info!(
        train_rows = train.n_rows(),
        test_rows = test.n_rows(),
        filled = train.missing_count() + test.missing_count(),
        n_iter = fitted.n_iter(),
        converged = fitted.converged(),
        "Imputed train and test"
    );
    Ok((train_out, test_out))
}
