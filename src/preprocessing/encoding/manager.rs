//! Column selection and per-column strategy dispatch.

use super::one_hot::OneHotEncoder;
use super::registry::{Encoder, EncoderRegistry};
use super::EncodingStrategy;
use crate::dataset::DataFrame;
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};

/// Specifies which columns an encoding call applies to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ColumnSelection {
    /// Every column declared `Categorical`, in frame order.
    #[default]
    Categorical,
    /// Exactly these columns, in this order.
    Named(Vec<String>),
}

impl ColumnSelection {
    pub fn named<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        ColumnSelection::Named(names.into_iter().map(Into::into).collect())
    }

    /// Resolve the selection against `data`.
    ///
    /// # Errors
    /// [`PreprocessingError::ColumnNotFound`] for a named column that is absent.
    pub fn resolve(&self, data: &DataFrame) -> Result<Vec<String>> {
        match self {
            ColumnSelection::Categorical => Ok(data.categorical_columns()),
            ColumnSelection::Named(names) => {
                for name in names {
                    data.column(name)?;
                }
                Ok(names.clone())
            }
        }
    }
}

impl From<&str> for ColumnSelection {
    fn from(name: &str) -> Self {
        ColumnSelection::Named(vec![name.to_string()])
    }
}

impl From<Vec<String>> for ColumnSelection {
    fn from(names: Vec<String>) -> Self {
        ColumnSelection::Named(names)
    }
}

impl From<Option<Vec<String>>> for ColumnSelection {
    fn from(names: Option<Vec<String>>) -> Self {
        names.map_or(ColumnSelection::Categorical, ColumnSelection::Named)
    }
}

/// Ordinal-encode the selected columns in place.
///
/// Encoders already present in `encoders` are reused and extended with any
/// unseen values; other columns get a fresh encoder. Every encoder used ends
/// up in the returned registry, along with the untouched entries of the
/// registry passed in.
///
/// # Errors
/// - [`PreprocessingError::ColumnNotFound`] for an unknown column.
/// - [`PreprocessingError::TypeMismatch`] if `encoders` holds a one-hot
///   encoder for a selected column.
pub fn encode_ordinal(
    data: &DataFrame,
    columns: &ColumnSelection,
    encoders: Option<EncoderRegistry>,
) -> Result<(DataFrame, EncoderRegistry)> {
    let selected = columns.resolve(data)?;
    let mut registry = encoders.unwrap_or_default();
    let mut out = data.clone();

    for name in &selected {
        let mut encoder = registry.take_ordinal(name)?.unwrap_or_default();
        let known = encoder.len();
        let encoded = encoder.transform_or_extend(out.column(name)?)?;
        out.replace_column(name, encoded)?;
        tracing::debug!(
            column = %name,
            categories = encoder.len(),
            added = encoder.len() - known,
            "Ordinal-encoded column"
        );
        registry.insert(name.clone(), Encoder::Ordinal(encoder));
    }

    Ok((out, registry))
}

/// One-hot encode the selected columns.
///
/// Each source column is fit afresh on the values present in `data`, dropped,
/// and replaced by its indicator columns appended at the end of the frame.
///
/// # Errors
/// - [`PreprocessingError::ColumnNotFound`] for an unknown column.
/// - [`PreprocessingError::DuplicateColumn`] if an indicator name is taken.
pub fn encode_onehot(
    data: &DataFrame,
    columns: &ColumnSelection,
) -> Result<(DataFrame, EncoderRegistry)> {
    let selected = columns.resolve(data)?;
    let mut registry = EncoderRegistry::new();
    let mut out = data.clone();

    for name in &selected {
        let source = out.drop_column(name)?;
        let fitted = OneHotEncoder::new().fit(&source)?;
        for indicator in fitted.transform(&source)? {
            out.push_column(indicator)?;
        }
        tracing::debug!(
            column = %name,
            indicators = fitted.n_features_out(),
            "One-hot encoded column"
        );
        registry.insert(name.clone(), Encoder::OneHot(fitted));
    }

    Ok((out, registry))
}

/// Encode each selected column with its own strategy.
///
/// `strategies[i]` applies to the i-th selected column. Columns are processed
/// in selection order and all encoders are collected into one registry.
///
/// # Errors
/// [`PreprocessingError::LengthMismatch`] when the number of strategies
/// differs from the number of selected columns; nothing is encoded then.
pub fn encode_selected<S>(
    data: &DataFrame,
    columns: &ColumnSelection,
    strategies: &[S],
) -> Result<(DataFrame, EncoderRegistry)>
where
    S: Copy + Into<EncodingStrategy>,
{
    let selected = columns.resolve(data)?;
    if strategies.len() != selected.len() {
        return Err(PreprocessingError::LengthMismatch {
            what: "strategies".to_string(),
            expected: selected.len(),
            got: strategies.len(),
        });
    }

    let mut registry = EncoderRegistry::new();
    let mut out = data.clone();

    for (name, &strategy) in selected.iter().zip(strategies) {
        let single = ColumnSelection::from(name.as_str());
        let (encoded, encoders) = match strategy.into() {
            EncodingStrategy::Ordinal => encode_ordinal(&out, &single, None)?,
            EncodingStrategy::OneHot => encode_onehot(&out, &single)?,
        };
        out = encoded;
        registry.merge(encoders);
    }

    tracing::info!(
        columns = selected.len(),
        ordinal = registry
            .iter()
            .filter(|(_, e)| matches!(e, Encoder::Ordinal(_)))
            .count(),
        out_cols = out.n_cols(),
        "Encoded categorical columns"
    );
    Ok((out, registry))
}
