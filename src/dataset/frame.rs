use super::{Cell, Column, ColumnType};
use crate::preprocessing::error::{PreprocessingError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

/// An ordered collection of equally long, uniquely named columns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    columns: Vec<Column>,
}

impl DataFrame {
    /// Create an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from columns.
    ///
    /// # Errors
    /// - [`PreprocessingError::DuplicateColumn`] if two columns share a name.
    /// - [`PreprocessingError::ShapeMismatch`] if column lengths differ.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.name()) {
                return Err(PreprocessingError::DuplicateColumn(col.name().to_string()));
            }
        }
        if let Some(first) = columns.first() {
            let rows = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
                return Err(PreprocessingError::ShapeMismatch {
                    expected: format!("{} rows", rows),
                    got: format!("{} rows in column {}", bad.len(), bad.name()),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Build an all-numeric frame from a matrix; NaN entries become missing.
    ///
    /// # Errors
    /// [`PreprocessingError::LengthMismatch`] if `names` does not match the
    /// number of matrix columns.
    pub fn from_array<S: AsRef<str>>(names: &[S], data: &Array2<f64>) -> Result<Self> {
        if names.len() != data.ncols() {
            return Err(PreprocessingError::LengthMismatch {
                what: "column names".to_string(),
                expected: data.ncols(),
                got: names.len(),
            });
        }
        let columns = names
            .iter()
            .zip(data.columns())
            .map(|(name, values)| Column::numeric(name.as_ref(), values.iter().copied()))
            .collect();
        Self::from_columns(columns)
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| PreprocessingError::ColumnNotFound(name.to_string()))
    }

    /// Cell at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.columns.get(col).and_then(|c| c.get(row))
    }

    pub(crate) fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.columns
            .get_mut(col)
            .and_then(|c| c.cells_mut().get_mut(row))
    }

    /// Names of every column declared `Categorical`, in frame order.
    pub fn categorical_columns(&self) -> Vec<String> {
        self.columns_of_type(ColumnType::Categorical)
    }

    /// Names of every column declared `Numeric`, in frame order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns_of_type(ColumnType::Numeric)
    }

    fn columns_of_type(&self, dtype: ColumnType) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.dtype() == dtype)
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Total number of missing cells.
    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    /// Append a column at the end.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.column_index(column.name()).is_some() {
            return Err(PreprocessingError::DuplicateColumn(column.name().to_string()));
        }
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(PreprocessingError::ShapeMismatch {
                expected: format!("{} rows", self.n_rows()),
                got: format!("{} rows in column {}", column.len(), column.name()),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Replace the column called `name` in place, keeping its position.
    /// The replacement keeps its own name and type.
    pub fn replace_column(&mut self, name: &str, column: Column) -> Result<()> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| PreprocessingError::ColumnNotFound(name.to_string()))?;
        if column.len() != self.n_rows() {
            return Err(PreprocessingError::ShapeMismatch {
                expected: format!("{} rows", self.n_rows()),
                got: format!("{} rows in column {}", column.len(), column.name()),
            });
        }
        if column.name() != name && self.column_index(column.name()).is_some() {
            return Err(PreprocessingError::DuplicateColumn(column.name().to_string()));
        }
        self.columns[idx] = column;
        Ok(())
    }

    /// Remove and return the column called `name`.
    pub fn drop_column(&mut self, name: &str) -> Result<Column> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| PreprocessingError::ColumnNotFound(name.to_string()))?;
        Ok(self.columns.remove(idx))
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<()> {
        let idx = self
            .column_index(from)
            .ok_or_else(|| PreprocessingError::ColumnNotFound(from.to_string()))?;
        if from != to && self.column_index(to).is_some() {
            return Err(PreprocessingError::DuplicateColumn(to.to_string()));
        }
        let col = self.columns.remove(idx).with_name(to);
        self.columns.insert(idx, col);
        Ok(())
    }

    /// New frame with only the named columns, in the given order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let columns = names
            .iter()
            .map(|n| self.column(n.as_ref()).cloned())
            .collect::<Result<Vec<_>>>()?;
        Self::from_columns(columns)
    }

    /// Rows `range` of every column, as a new frame.
    pub fn slice_rows(&self, range: Range<usize>) -> Result<Self> {
        if range.start > range.end || range.end > self.n_rows() {
            return Err(PreprocessingError::ShapeMismatch {
                expected: format!("row range within 0..{}", self.n_rows()),
                got: format!("{:?}", range),
            });
        }
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name(), c.dtype(), c.cells()[range.clone()].to_vec()))
            .collect::<Result<Vec<_>>>()?;
        Self::from_columns(columns)
    }

    /// Split into a leading train partition and a trailing test partition.
    ///
    /// `train_ratio` must lie in `[0, 1]`; row order is kept.
    pub fn split(&self, train_ratio: f64) -> Result<(Self, Self)> {
        if !(0.0..=1.0).contains(&train_ratio) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "train_ratio must be in [0, 1], got {}",
                train_ratio
            )));
        }
        let n_train = (self.n_rows() as f64 * train_ratio) as usize;
        Ok((
            self.slice_rows(0..n_train)?,
            self.slice_rows(n_train..self.n_rows())?,
        ))
    }

    /// Row-major numeric matrix with missing cells as NaN.
    ///
    /// # Errors
    /// [`PreprocessingError::TypeMismatch`] if any column is not `Numeric`.
    pub fn to_array(&self) -> Result<Array2<f64>> {
        let (rows, cols) = self.shape();
        let mut out = Array2::<f64>::from_elem((rows, cols), f64::NAN);
        for (j, col) in self.columns.iter().enumerate() {
            if col.dtype() != ColumnType::Numeric {
                return Err(PreprocessingError::TypeMismatch {
                    column: col.name().to_string(),
                    expected: ColumnType::Numeric.to_string(),
                });
            }
            for (i, v) in col.to_f64_vec()?.into_iter().enumerate() {
                out[[i, j]] = v;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample() -> DataFrame {
        DataFrame::from_columns(vec![
            Column::categorical("shape", ["bell", "flat", "knob"]),
            Column::numeric("size", [1.0, 2.0, f64::NAN]),
        ])
        .unwrap()
    }

    #[test]
    fn test_frame_shape() {
        let df = sample();
        assert_eq!(df.shape(), (3, 2));
        assert_eq!(df.column_names(), vec!["shape", "size"]);
        assert_eq!(df.missing_count(), 1);
    }

    #[test]
    fn test_frame_rejects_duplicate_names() {
        let result = DataFrame::from_columns(vec![
            Column::numeric("a", [1.0]),
            Column::numeric("a", [2.0]),
        ]);
        assert!(matches!(result, Err(PreprocessingError::DuplicateColumn(_))));
    }

    #[test]
    fn test_frame_rejects_ragged_columns() {
        let result = DataFrame::from_columns(vec![
            Column::numeric("a", [1.0, 2.0]),
            Column::numeric("b", [2.0]),
        ]);
        assert!(matches!(result, Err(PreprocessingError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_frame_typed_selection() {
        let df = sample();
        assert_eq!(df.categorical_columns(), vec!["shape".to_string()]);
        assert_eq!(df.numeric_columns(), vec!["size".to_string()]);
    }

    #[test]
    fn test_frame_column_not_found() {
        let df = sample();
        assert!(matches!(
            df.column("color"),
            Err(PreprocessingError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_frame_replace_keeps_position() {
        let mut df = sample();
        df.replace_column("shape", Column::numeric("shape", [0.0, 1.0, 2.0]))
            .unwrap();
        assert_eq!(df.column_names(), vec!["shape", "size"]);
        assert_eq!(df.column("shape").unwrap().dtype(), ColumnType::Numeric);
    }

    #[test]
    fn test_frame_drop_and_rename() {
        let mut df = sample();
        df.rename_column("size", "diameter").unwrap();
        let dropped = df.drop_column("shape").unwrap();
        assert_eq!(dropped.name(), "shape");
        assert_eq!(df.column_names(), vec!["diameter"]);
    }

    #[test]
    fn test_frame_to_array_requires_numeric() {
        let df = sample();
        assert!(matches!(
            df.to_array(),
            Err(PreprocessingError::TypeMismatch { .. })
        ));

        let numeric = df.select(&["size"]).unwrap();
        let arr = numeric.to_array().unwrap();
        assert_eq!(arr.shape(), &[3, 1]);
        assert!(arr[[2, 0]].is_nan());
    }

    #[test]
    fn test_frame_split_keeps_order() {
        let df = sample();
        let (train, test) = df.split(0.67).unwrap();
        assert_eq!(train.n_rows(), 2);
        assert_eq!(test.n_rows(), 1);
        assert_eq!(test.get(0, 0), Some(&Cell::text("knob")));
        assert!(df.split(1.5).is_err());
    }

    #[test]
    fn test_frame_from_array() {
        let data = array![[1.0, f64::NAN], [3.0, 4.0]];
        let df = DataFrame::from_array(&["a", "b"], &data).unwrap();
        assert_eq!(df.get(0, 1), Some(&Cell::Missing));
        assert_eq!(df.get(1, 0), Some(&Cell::Number(3.0)));

        let bad = DataFrame::from_array(&["a"], &data);
        assert!(matches!(bad, Err(PreprocessingError::LengthMismatch { .. })));
    }
}
