//! Simple Imputer.
//!
//! Fills missing cells of numeric columns with one per-column statistic:
//! mean, median, most frequent value, or a constant. Also serves as the
//! initial fill of [`IterativeImputer`](super::IterativeImputer).
//!
//! # Example
//! ```ignore
//! use tabprep::preprocessing::{FittedTransformer, ImputeStrategy, SimpleImputer, Transformer};
//!
//! let fitted = SimpleImputer::new(ImputeStrategy::Median).fit(&train)?;
//! let filled = fitted.transform(&test)?;
//! ```

use crate::dataset::{Cell, Column, ColumnType, DataFrame};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Strategy for imputing missing values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeStrategy {
    /// Replace missing values with the mean of each column.
    #[default]
    Mean,
    /// Replace missing values with the median of each column.
    Median,
    /// Replace missing values with the most frequent value of each column.
    MostFrequent,
    /// Replace missing values with a constant value.
    Constant(f64),
}

/// SimpleImputer transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct SimpleImputer {
    strategy: ImputeStrategy,
}

impl SimpleImputer {
    /// Create a new SimpleImputer with the specified strategy.
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ImputeStrategy {
        self.strategy
    }
}

/// Compute the fill value of one column, ignoring NaN.
///
/// A column with no observed value gets 0, except under `Constant`.
fn compute_statistic(values: &[f64], strategy: ImputeStrategy) -> f64 {
    let observed: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if let ImputeStrategy::Constant(val) = strategy {
        return val;
    }
    if observed.is_empty() {
        return 0.0;
    }

    match strategy {
        ImputeStrategy::Mean => observed.iter().sum::<f64>() / observed.len() as f64,
        ImputeStrategy::Median => {
            let mut sorted = observed;
            sorted.sort_by(f64::total_cmp);
            let n = sorted.len();
            if n % 2 == 0 {
                (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
            } else {
                sorted[n / 2]
            }
        }
        ImputeStrategy::MostFrequent => {
            let mut counts: HashMap<u64, usize> = HashMap::new();
            for &v in &observed {
                *counts.entry(v.to_bits()).or_insert(0) += 1;
            }
            // Ties go to the smallest value.
            counts
                .into_iter()
                .map(|(bits, count)| (f64::from_bits(bits), count))
                .max_by(|a, b| a.1.cmp(&b.1).then(b.0.total_cmp(&a.0)))
                .map_or(0.0, |(v, _)| v)
        }
        ImputeStrategy::Constant(val) => val,
    }
}

fn require_numeric(column: &Column) -> Result<(), PreprocessingError> {
    if column.dtype() != ColumnType::Numeric {
        return Err(PreprocessingError::TypeMismatch {
            column: column.name().to_string(),
            expected: ColumnType::Numeric.to_string(),
        });
    }
    Ok(())
}

impl Transformer for SimpleImputer {
    type Input = DataFrame;
    type Output = DataFrame;
    type Fitted = FittedSimpleImputer;

    fn fit(&self, data: &DataFrame) -> Result<FittedSimpleImputer, PreprocessingError> {
        if data.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit SimpleImputer on empty data".to_string(),
            ));
        }

        let mut columns = Vec::with_capacity(data.n_cols());
        let mut statistics = Vec::with_capacity(data.n_cols());
        for column in data.columns() {
            require_numeric(column)?;
            columns.push(column.name().to_string());
            statistics.push(compute_statistic(&column.to_f64_vec()?, self.strategy));
        }

        Ok(FittedSimpleImputer {
            strategy: self.strategy,
            columns,
            statistics,
        })
    }
}

/// Fitted SimpleImputer ready for inference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedSimpleImputer {
    strategy: ImputeStrategy,
    columns: Vec<String>,
    statistics: Vec<f64>,
}

impl FittedSimpleImputer {
    /// Get the imputation statistics (fill values) for each feature.
    pub fn statistics(&self) -> &[f64] {
        &self.statistics
    }

    pub fn strategy(&self) -> ImputeStrategy {
        self.strategy
    }

    /// Column names seen during fit.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Replace every NaN of `x` with the statistic of its column.
    pub(crate) fn fill_array(&self, x: &mut Array2<f64>) -> Result<(), PreprocessingError> {
        if x.ncols() != self.statistics.len() {
            return Err(PreprocessingError::ShapeMismatch {
                expected: format!("{} features", self.statistics.len()),
                got: format!("{} features", x.ncols()),
            });
        }
        for (mut col, &stat) in x.columns_mut().into_iter().zip(&self.statistics) {
            col.mapv_inplace(|v| if v.is_nan() { stat } else { v });
        }
        Ok(())
    }

    fn check_columns(&self, data: &DataFrame) -> Result<(), PreprocessingError> {
        let names: Vec<&str> = data.column_names();
        if names != self.columns {
            return Err(PreprocessingError::ColumnMismatch {
                expected: self.columns.clone(),
                got: names.into_iter().map(String::from).collect(),
            });
        }
        Ok(())
    }
}

impl FittedTransformer for FittedSimpleImputer {
    type Input = DataFrame;
    type Output = DataFrame;

    fn transform(&self, data: &DataFrame) -> Result<DataFrame, PreprocessingError> {
        self.check_columns(data)?;
        let mut out = data.clone();
        for (j, &stat) in self.statistics.iter().enumerate() {
            require_numeric(&data.columns()[j])?;
            for row in 0..out.n_rows() {
                if let Some(cell) = out.cell_mut(row, j) {
                    if cell.is_missing() {
                        *cell = Cell::Number(stat);
                    }
                }
            }
        }
        Ok(out)
    }

    fn inverse_transform(&self, _data: &DataFrame) -> Result<DataFrame, PreprocessingError> {
        Err(PreprocessingError::InvalidParameter(
            "SimpleImputer does not support inverse_transform (missing value information is lost)"
                .to_string(),
        ))
    }

    fn n_features_in(&self) -> usize {
        self.columns.len()
    }
}
