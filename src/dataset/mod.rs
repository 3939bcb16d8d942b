//! Tabular data model shared by every preprocessing component.
//!
//! A [`DataFrame`] is an ordered sequence of named [`Column`]s. Every column
//! declares its [`ColumnType`] when it is built (usually once, at ingestion),
//! and holds one [`Cell`] per row. Row order is significant and is preserved
//! by every transformation in this crate.
//!
//! # Example
//!
//! ```rust
//! use tabprep::dataset::{Cell, Column, DataFrame};
//!
//! let df = DataFrame::from_columns(vec![
//!     Column::categorical("shape", ["bell", "flat", "bell"]),
//!     Column::numeric("size", [1.5, f64::NAN, 3.0]),
//! ])
//! .unwrap();
//!
//! assert_eq!(df.shape(), (3, 2));
//! assert_eq!(df.categorical_columns(), vec!["shape".to_string()]);
//! assert_eq!(df.get(1, 1), Some(&Cell::Missing));
//! ```

pub mod csv;
mod frame;

pub use self::frame::DataFrame;

use crate::preprocessing::error::{PreprocessingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single value of a tabular dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// The missing-value marker. Distinct from every valid value.
    Missing,
    /// A finite or infinite number. Never NaN: NaN is stored as `Missing`.
    Number(f64),
    /// Categorical text.
    Text(String),
}

impl Cell {
    /// Build a numeric cell, mapping NaN to [`Cell::Missing`].
    pub fn number(value: f64) -> Self {
        if value.is_nan() {
            Cell::Missing
        } else {
            Cell::Number(value)
        }
    }

    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric view of the cell. `None` for missing or text cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Category key of the cell: text as-is, numbers in their display form.
    /// `None` for missing cells.
    pub fn as_category(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            Cell::Number(v) => Some(v.to_string()),
            Cell::Text(s) => Some(s.clone()),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Missing
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => write!(f, "NA"),
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Missing)
    }
}

/// Declared logical type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Numbers and missing markers only.
    Numeric,
    /// Text categories (numbers are keyed by their display form).
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Categorical => write!(f, "categorical"),
        }
    }
}

/// A named, typed column of cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    dtype: ColumnType,
    cells: Vec<Cell>,
}

impl Column {
    /// Create a column with an explicit type.
    ///
    /// # Errors
    /// [`PreprocessingError::TypeMismatch`] if a `Numeric` column contains text.
    pub fn new(name: impl Into<String>, dtype: ColumnType, cells: Vec<Cell>) -> Result<Self> {
        let name = name.into();
        if dtype == ColumnType::Numeric && cells.iter().any(|c| matches!(c, Cell::Text(_))) {
            return Err(PreprocessingError::TypeMismatch {
                column: name,
                expected: ColumnType::Numeric.to_string(),
            });
        }
        Ok(Self { name, dtype, cells })
    }

    /// Create a column, declaring it `Categorical` when any cell is text.
    pub fn infer(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        let dtype = if cells.iter().any(|c| matches!(c, Cell::Text(_))) {
            ColumnType::Categorical
        } else {
            ColumnType::Numeric
        };
        Self {
            name: name.into(),
            dtype,
            cells,
        }
    }

    /// Numeric column from raw values; NaN becomes missing.
    pub fn numeric(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            name: name.into(),
            dtype: ColumnType::Numeric,
            cells: values.into_iter().map(Cell::number).collect(),
        }
    }

    /// Categorical column from text values.
    pub fn categorical<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            dtype: ColumnType::Categorical,
            cells: values.into_iter().map(|v| Cell::Text(v.into())).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> ColumnType {
        self.dtype
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Cell> {
        self.cells.get(row)
    }

    /// Number of missing cells.
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// Numeric values with missing cells as NaN.
    ///
    /// # Errors
    /// [`PreprocessingError::TypeMismatch`] if the column holds text.
    pub fn to_f64_vec(&self) -> Result<Vec<f64>> {
        self.cells
            .iter()
            .map(|c| match c {
                Cell::Missing => Ok(f64::NAN),
                Cell::Number(v) => Ok(*v),
                Cell::Text(_) => Err(PreprocessingError::TypeMismatch {
                    column: self.name.clone(),
                    expected: ColumnType::Numeric.to_string(),
                }),
            })
            .collect()
    }

    pub(crate) fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_number_nan_is_missing() {
        assert_eq!(Cell::number(f64::NAN), Cell::Missing);
        assert_eq!(Cell::number(2.5), Cell::Number(2.5));
    }

    #[test]
    fn test_cell_as_category() {
        assert_eq!(Cell::text("red").as_category(), Some("red".to_string()));
        assert_eq!(Cell::Number(3.0).as_category(), Some("3".to_string()));
        assert_eq!(Cell::Missing.as_category(), None);
    }

    #[test]
    fn test_cell_from_option() {
        let c: Cell = Some(1.0).into();
        assert_eq!(c, Cell::Number(1.0));
        let m: Cell = Option::<&str>::None.into();
        assert!(m.is_missing());
    }

    #[test]
    fn test_column_new_rejects_text_in_numeric() {
        let result = Column::new("x", ColumnType::Numeric, vec![Cell::text("a")]);
        assert!(matches!(
            result,
            Err(PreprocessingError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_column_infer() {
        let cat = Column::infer("c", vec![Cell::Number(1.0), Cell::text("b")]);
        assert_eq!(cat.dtype(), ColumnType::Categorical);

        let num = Column::infer("n", vec![Cell::Number(1.0), Cell::Missing]);
        assert_eq!(num.dtype(), ColumnType::Numeric);
    }

    #[test]
    fn test_column_missing_count() {
        let col = Column::numeric("x", [1.0, f64::NAN, f64::NAN]);
        assert_eq!(col.missing_count(), 2);
        assert_eq!(col.len(), 3);
    }

    #[test]
    fn test_column_to_f64_vec() {
        let col = Column::numeric("x", [1.0, f64::NAN]);
        let vals = col.to_f64_vec().unwrap();
        assert_eq!(vals[0], 1.0);
        assert!(vals[1].is_nan());

        let text = Column::categorical("c", ["a"]);
        assert!(text.to_f64_vec().is_err());
    }
}
