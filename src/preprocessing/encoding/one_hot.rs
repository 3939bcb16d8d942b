//! One-hot encoding for categorical features.
//!
//! Expands one categorical column into one indicator column per category
//! observed at fit time. The category set is fixed once fitted.

use crate::dataset::{Cell, Column, ColumnType};
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One-hot encoder for a single categorical column (unfitted).
///
/// # Example
/// ```ignore
/// use tabprep::dataset::Column;
/// use tabprep::preprocessing::{OneHotEncoder, Transformer, FittedTransformer};
///
/// let color = Column::categorical("color", ["red", "blue", "red"]);
/// let fitted = OneHotEncoder::new().fit(&color)?;
///
/// // Output: color_blue = [0, 1, 0], color_red = [1, 0, 1]
/// let indicators = fitted.transform(&color)?;
/// ```
#[derive(Clone, Debug)]
pub struct OneHotEncoder {
    separator: String,
}

impl OneHotEncoder {
    /// Create a new OneHotEncoder naming outputs `{column}_{category}`.
    pub fn new() -> Self {
        Self {
            separator: "_".to_string(),
        }
    }

    /// Set the separator between column name and category in output names.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fitted OneHotEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedOneHotEncoder {
    /// Name of the source column.
    column: String,
    /// Categories (unique sorted values) seen during fit.
    categories: Vec<String>,
    separator: String,
}

impl FittedOneHotEncoder {
    /// Categories learned during fit, in output-column order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Name of the column this encoder was fit on.
    pub fn source_column(&self) -> &str {
        &self.column
    }

    /// Names of the indicator columns produced by `transform`.
    pub fn feature_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|cat| format!("{}{}{}", self.column, self.separator, cat))
            .collect()
    }

    /// Get the number of output features.
    pub fn n_features_out(&self) -> usize {
        self.categories.len()
    }

    fn category_index(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }
}

impl Transformer for OneHotEncoder {
    type Input = Column;
    type Output = Vec<Column>;
    type Fitted = FittedOneHotEncoder;

    /// A column with no observed values yields zero categories and so zero
    /// indicator columns.
    fn fit(&self, column: &Column) -> Result<FittedOneHotEncoder> {
        let categories: BTreeSet<String> = column
            .cells()
            .iter()
            .filter_map(Cell::as_category)
            .collect();

        Ok(FittedOneHotEncoder {
            column: column.name().to_string(),
            categories: categories.into_iter().collect(),
            separator: self.separator.clone(),
        })
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Input = Column;
    type Output = Vec<Column>;

    /// One indicator column per category. A missing source cell yields a
    /// missing cell in every indicator column of that row.
    fn transform(&self, column: &Column) -> Result<Vec<Column>> {
        let rows = column.len();
        let mut indicators = vec![vec![Cell::Number(0.0); rows]; self.categories.len()];

        for (row, cell) in column.cells().iter().enumerate() {
            match cell.as_category() {
                None => {
                    for ind in indicators.iter_mut() {
                        ind[row] = Cell::Missing;
                    }
                }
                Some(value) => {
                    let idx = self.category_index(&value).ok_or_else(|| {
                        PreprocessingError::UnknownCategory {
                            column: column.name().to_string(),
                            value,
                        }
                    })?;
                    indicators[idx][row] = Cell::Number(1.0);
                }
            }
        }

        self.feature_names()
            .into_iter()
            .zip(indicators)
            .map(|(name, cells)| Column::new(name, ColumnType::Numeric, cells))
            .collect()
    }

    fn inverse_transform(&self, columns: &Vec<Column>) -> Result<Column> {
        if columns.len() != self.categories.len() {
            return Err(PreprocessingError::LengthMismatch {
                what: "indicator columns".to_string(),
                expected: self.categories.len(),
                got: columns.len(),
            });
        }
        let rows = columns.first().map_or(0, Column::len);
        let mut cells = Vec::with_capacity(rows);
        for row in 0..rows {
            let hot = columns
                .iter()
                .position(|c| c.get(row).and_then(Cell::as_f64).is_some_and(|v| v > 0.5));
            cells.push(hot.map_or(Cell::Missing, |i| Cell::text(self.categories[i].clone())));
        }
        Column::new(self.column.clone(), ColumnType::Categorical, cells)
    }

    fn n_features_in(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(col: &Column) -> Vec<Option<f64>> {
        col.cells().iter().map(Cell::as_f64).collect()
    }

    #[test]
    fn test_one_hot_encoder_color_scenario() {
        let color = Column::categorical("color", ["red", "blue", "red"]);
        let fitted = OneHotEncoder::new().fit(&color).unwrap();

        assert_eq!(fitted.n_features_out(), 2);
        assert_eq!(fitted.feature_names(), vec!["color_blue", "color_red"]);

        let out = fitted.transform(&color).unwrap();
        assert_eq!(values(&out[0]), vec![Some(0.0), Some(1.0), Some(0.0)]);
        assert_eq!(values(&out[1]), vec![Some(1.0), Some(0.0), Some(1.0)]);

        for row in 0..3 {
            let sum: f64 = out.iter().filter_map(|c| c.get(row)?.as_f64()).sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_one_hot_encoder_column_count_matches_distinct() {
        let col = Column::categorical("odor", ["a", "l", "c", "y", "a", "l"]);
        let out = OneHotEncoder::new().fit_transform(&col).unwrap();
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|c| c.dtype() == ColumnType::Numeric));
    }

    #[test]
    fn test_one_hot_encoder_unknown_is_error() {
        let train = Column::categorical("color", ["red", "blue"]);
        let fitted = OneHotEncoder::new().fit(&train).unwrap();

        let result = fitted.transform(&Column::categorical("color", ["green"]));
        assert!(matches!(
            result,
            Err(PreprocessingError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_one_hot_encoder_missing_row() {
        let col = Column::new(
            "c",
            ColumnType::Categorical,
            vec![Cell::text("a"), Cell::Missing, Cell::text("b")],
        )
        .unwrap();
        let fitted = OneHotEncoder::new().fit(&col).unwrap();
        assert_eq!(fitted.categories(), &["a", "b"]);

        let out = fitted.transform(&col).unwrap();
        assert!(out.iter().all(|c| c.cells()[1].is_missing()));
    }

    #[test]
    fn test_one_hot_encoder_inverse() {
        let col = Column::categorical("class", ["p", "e", "e"]);
        let fitted = OneHotEncoder::new().fit(&col).unwrap();
        let out = fitted.transform(&col).unwrap();
        let recovered = fitted.inverse_transform(&out).unwrap();
        assert_eq!(recovered, col);
    }

    #[test]
    fn test_one_hot_encoder_inverse_wrong_width() {
        let col = Column::categorical("class", ["p", "e"]);
        let fitted = OneHotEncoder::new().fit(&col).unwrap();
        let result = fitted.inverse_transform(&vec![Column::numeric("x", [1.0, 0.0])]);
        assert!(matches!(result, Err(PreprocessingError::LengthMismatch { .. })));
    }

    #[test]
    fn test_one_hot_encoder_custom_separator() {
        let col = Column::categorical("c", ["a"]);
        let fitted = OneHotEncoder::new().with_separator("=").fit(&col).unwrap();
        assert_eq!(fitted.feature_names(), vec!["c=a"]);
    }

    #[test]
    fn test_one_hot_encoder_empty_column() {
        let col = Column::categorical::<&str>("c", []);
        let fitted = OneHotEncoder::new().fit(&col).unwrap();
        assert_eq!(fitted.n_features_out(), 0);
        assert!(fitted.transform(&col).unwrap().is_empty());
    }
}
