//! Ordinal encoding for categorical features.
//!
//! Maps category values to integer codes (0, 1, 2, ...) through a vocabulary
//! that can only grow. A code, once handed out for a value, is never
//! reassigned to anything else.

use crate::dataset::{Cell, Column, ColumnType};
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::traits::FittedTransformer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Ordinal encoder with an extensible vocabulary.
///
/// `categories[code]` is the value for `code`, and `mapping[value]` is its
/// code. Extension appends new values (sorted among themselves) after the
/// existing ones, so previously issued codes stay valid.
///
/// # Example
/// ```ignore
/// use tabprep::dataset::Column;
/// use tabprep::preprocessing::OrdinalEncoder;
///
/// let mut encoder = OrdinalEncoder::new();
/// let codes = encoder.transform_or_extend(&Column::categorical("cap", ["x", "b", "x"]))?;
/// // b -> 0, x -> 1
///
/// // A later call with an unseen value extends instead of failing.
/// let more = encoder.transform_or_extend(&Column::categorical("cap", ["f", "x"]))?;
/// // f -> 2, x -> 1
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdinalEncoder {
    categories: Vec<String>,
    mapping: HashMap<String, usize>,
}

/// Progress of a single [`OrdinalEncoder::transform_or_extend`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Attempt {
    Trying,
    Extending,
    Retried,
}

impl OrdinalEncoder {
    /// Create an encoder with an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder whose codes follow the order of `categories`.
    ///
    /// # Errors
    /// [`PreprocessingError::InvalidParameter`] if a category is repeated.
    pub fn from_categories<S: Into<String>>(
        categories: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let mut encoder = Self::new();
        for cat in categories {
            let cat = cat.into();
            if encoder.mapping.contains_key(&cat) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "duplicate category '{}'",
                    cat
                )));
            }
            encoder.push(cat);
        }
        Ok(encoder)
    }

    /// Fresh encoder fit on the distinct non-missing values of `column`,
    /// codes assigned in sorted value order.
    pub fn fit(column: &Column) -> Self {
        let mut encoder = Self::new();
        encoder.extend(column.cells().iter().filter_map(Cell::as_category));
        encoder
    }

    /// Known categories, indexed by code.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Code for `value`, if known.
    pub fn code(&self, value: &str) -> Option<usize> {
        self.mapping.get(value).copied()
    }

    /// Category for `code`, if assigned.
    pub fn category(&self, code: usize) -> Option<&str> {
        self.categories.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn push(&mut self, value: String) {
        self.mapping.insert(value.clone(), self.categories.len());
        self.categories.push(value);
    }

    /// Add every unseen value to the vocabulary and return how many were added.
    ///
    /// The vocabulary becomes the union of the old one and `values`. Existing
    /// codes are untouched; new values receive the next free codes in sorted
    /// order.
    pub fn extend<I, S>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fresh: BTreeSet<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|v| !self.mapping.contains_key(v))
            .collect();
        let added = fresh.len();
        for value in fresh {
            self.push(value);
        }
        added
    }

    /// Encode `column`, extending the vocabulary once if it holds unseen values.
    ///
    /// At most one extension happens per call. Missing cells stay missing.
    pub fn transform_or_extend(&mut self, column: &Column) -> Result<Column> {
        let mut attempt = Attempt::Trying;
        loop {
            match (attempt, self.transform(column)) {
                (_, Ok(encoded)) => return Ok(encoded),
                (Attempt::Trying, Err(PreprocessingError::UnknownCategory { value, .. })) => {
                    tracing::debug!(
                        column = column.name(),
                        first_unseen = %value,
                        known = self.len(),
                        "Extending ordinal vocabulary"
                    );
                    attempt = Attempt::Extending;
                }
                (Attempt::Retried, Err(err)) => {
                    return Err(PreprocessingError::NumericalError(format!(
                        "ordinal transform of column {} failed after extension: {}",
                        column.name(),
                        err
                    )));
                }
                (_, Err(err)) => return Err(err),
            }

            if attempt == Attempt::Extending {
                let added = self.extend(column.cells().iter().filter_map(Cell::as_category));
                tracing::debug!(column = column.name(), added, total = self.len(), "Vocabulary extended");
                attempt = Attempt::Retried;
            }
        }
    }
}

impl FittedTransformer for OrdinalEncoder {
    type Input = Column;
    type Output = Column;

    /// Strict encoding: any unseen value is [`PreprocessingError::UnknownCategory`].
    fn transform(&self, column: &Column) -> Result<Column> {
        let cells = column
            .cells()
            .iter()
            .map(|cell| match cell.as_category() {
                None => Ok(Cell::Missing),
                Some(value) => match self.mapping.get(&value) {
                    Some(&code) => Ok(Cell::Number(code as f64)),
                    None => Err(PreprocessingError::UnknownCategory {
                        column: column.name().to_string(),
                        value,
                    }),
                },
            })
            .collect::<Result<Vec<_>>>()?;
        Column::new(column.name(), ColumnType::Numeric, cells)
    }

    fn inverse_transform(&self, column: &Column) -> Result<Column> {
        let cells = column
            .cells()
            .iter()
            .map(|cell| match cell {
                Cell::Missing => Ok(Cell::Missing),
                Cell::Number(code) if *code >= 0.0 && code.fract() == 0.0 => self
                    .category(*code as usize)
                    .map(Cell::text)
                    .ok_or_else(|| PreprocessingError::UnknownCategory {
                        column: column.name().to_string(),
                        value: code.to_string(),
                    }),
                other => Err(PreprocessingError::UnknownCategory {
                    column: column.name().to_string(),
                    value: other.to_string(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        Column::new(column.name(), ColumnType::Categorical, cells)
    }

    fn n_features_in(&self) -> usize {
        1
    }
}
