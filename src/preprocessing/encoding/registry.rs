//! Encoders keyed by the column they were built for.

use super::one_hot::FittedOneHotEncoder;
use super::ordinal::OrdinalEncoder;
use crate::dataset::DataFrame;
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::traits::FittedTransformer;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{BTreeMap, Iter};

/// A fitted encoder of either strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Encoder {
    Ordinal(OrdinalEncoder),
    OneHot(FittedOneHotEncoder),
}

impl Encoder {
    /// Get the strategy name.
    pub fn strategy_name(&self) -> &'static str {
        match self {
            Encoder::Ordinal(_) => "ordinal",
            Encoder::OneHot(_) => "one_hot",
        }
    }
}

/// Mapping from column name to the encoder that owns that column.
///
/// Built fresh per preprocessing run and handed back to the caller, who may
/// pass it into a later call to keep extending the same ordinal encoders,
/// apply it to new data, or invert the encoding.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EncoderRegistry {
    encoders: BTreeMap<String, Encoder>,
}

impl EncoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.encoders.contains_key(column)
    }

    pub fn get(&self, column: &str) -> Option<&Encoder> {
        self.encoders.get(column)
    }

    /// Ordinal encoder for `column`, if that is what it holds.
    pub fn ordinal(&self, column: &str) -> Option<&OrdinalEncoder> {
        match self.encoders.get(column) {
            Some(Encoder::Ordinal(e)) => Some(e),
            _ => None,
        }
    }

    /// One-hot encoder for `column`, if that is what it holds.
    pub fn one_hot(&self, column: &str) -> Option<&FittedOneHotEncoder> {
        match self.encoders.get(column) {
            Some(Encoder::OneHot(e)) => Some(e),
            _ => None,
        }
    }

    /// Insert an encoder, returning the one previously registered for the column.
    pub fn insert(&mut self, column: impl Into<String>, encoder: Encoder) -> Option<Encoder> {
        self.encoders.insert(column.into(), encoder)
    }

    pub fn remove(&mut self, column: &str) -> Option<Encoder> {
        self.encoders.remove(column)
    }

    /// Move every encoder of `other` into `self`; `other` wins on conflicts.
    pub fn merge(&mut self, other: EncoderRegistry) {
        self.encoders.extend(other.encoders);
    }

    pub fn iter(&self) -> Iter<'_, String, Encoder> {
        self.encoders.iter()
    }

    /// Encode new data with the registered encoders.
    ///
    /// Ordinal encoders extend their vocabulary on unseen values; one-hot
    /// encoders reject them. Indicator columns are appended at the end, in
    /// registry order. On error the registry is left unchanged.
    pub fn apply(&mut self, data: &DataFrame) -> Result<DataFrame> {
        let mut out = data.clone();
        let mut encoders = self.encoders.clone();
        for (name, encoder) in encoders.iter_mut() {
            let column = out.column(name)?.clone();
            match encoder {
                Encoder::Ordinal(enc) => {
                    let encoded = enc.transform_or_extend(&column)?;
                    out.replace_column(name, encoded)?;
                }
                Encoder::OneHot(enc) => {
                    let indicators = enc.transform(&column)?;
                    out.drop_column(name)?;
                    for ind in indicators {
                        out.push_column(ind)?;
                    }
                }
            }
        }
        self.encoders = encoders;
        Ok(out)
    }

    /// Undo every registered encoding.
    ///
    /// Ordinal columns are decoded in place; indicator columns are collapsed
    /// back into their source column, appended at the end.
    pub fn inverse_transform(&self, data: &DataFrame) -> Result<DataFrame> {
        let mut out = data.clone();
        for (name, encoder) in &self.encoders {
            match encoder {
                Encoder::Ordinal(enc) => {
                    let decoded = enc.inverse_transform(out.column(name)?)?;
                    out.replace_column(name, decoded)?;
                }
                Encoder::OneHot(enc) => {
                    let names = enc.feature_names();
                    let indicators = names
                        .iter()
                        .map(|n| out.drop_column(n))
                        .collect::<Result<Vec<_>>>()?;
                    let decoded = enc.inverse_transform(&indicators)?;
                    out.push_column(decoded)?;
                }
            }
        }
        Ok(out)
    }

    /// Take the ordinal encoder registered for `column`, if any.
    ///
    /// # Errors
    /// [`PreprocessingError::TypeMismatch`] if the column holds a one-hot encoder.
    pub(crate) fn take_ordinal(&mut self, column: &str) -> Result<Option<OrdinalEncoder>> {
        match self.encoders.remove(column) {
            None => Ok(None),
            Some(Encoder::Ordinal(e)) => Ok(Some(e)),
            Some(other) => {
                self.encoders.insert(column.to_string(), other);
                Err(PreprocessingError::TypeMismatch {
                    column: column.to_string(),
                    expected: "ordinal encoder".to_string(),
                })
            }
        }
    }
}

impl IntoIterator for EncoderRegistry {
    type Item = (String, Encoder);
    type IntoIter = std::collections::btree_map::IntoIter<String, Encoder>;

    fn into_iter(self) -> Self::IntoIter {
        self.encoders.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Cell, Column};
    use crate::preprocessing::traits::Transformer;
    use crate::preprocessing::encoding::OneHotEncoder;

    fn frame() -> DataFrame {
        DataFrame::from_columns(vec![
            Column::categorical("class", ["p", "e"]),
            Column::categorical("color", ["red", "blue"]),
            Column::numeric("size", [1.0, 2.0]),
        ])
        .unwrap()
    }

    fn registry() -> EncoderRegistry {
        let df = frame();
        let mut reg = EncoderRegistry::new();
        reg.insert(
            "class",
            Encoder::Ordinal(OrdinalEncoder::fit(df.column("class").unwrap())),
        );
        reg.insert(
            "color",
            Encoder::OneHot(OneHotEncoder::new().fit(df.column("color").unwrap()).unwrap()),
        );
        reg
    }

    #[test]
    fn test_registry_typed_access() {
        let reg = registry();
        assert_eq!(reg.len(), 2);
        assert!(reg.ordinal("class").is_some());
        assert!(reg.one_hot("class").is_none());
        assert!(reg.one_hot("color").is_some());
        assert_eq!(reg.get("color").unwrap().strategy_name(), "one_hot");
    }

    #[test]
    fn test_registry_apply_and_invert() {
        let mut reg = registry();
        let df = frame();
        let encoded = reg.apply(&df).unwrap();
        assert_eq!(
            encoded.column_names(),
            vec!["class", "size", "color_blue", "color_red"]
        );

        let decoded = reg.inverse_transform(&encoded).unwrap();
        assert_eq!(decoded.column_names(), vec!["class", "size", "color"]);
        assert_eq!(decoded.column("class").unwrap(), df.column("class").unwrap());
        assert_eq!(decoded.column("color").unwrap(), df.column("color").unwrap());
    }

    #[test]
    fn test_registry_apply_extends_ordinal_only() {
        let mut reg = registry();
        let new_data = DataFrame::from_columns(vec![
            Column::categorical("class", ["x"]),
            Column::categorical("color", ["red"]),
        ])
        .unwrap();
        let encoded = reg.apply(&new_data).unwrap();
        assert_eq!(encoded.get(0, 0), Some(&Cell::Number(2.0)));
        assert_eq!(reg.ordinal("class").unwrap().len(), 3);

        let unseen_color = DataFrame::from_columns(vec![
            Column::categorical("class", ["p"]),
            Column::categorical("color", ["green"]),
        ])
        .unwrap();
        assert!(matches!(
            reg.apply(&unseen_color),
            Err(PreprocessingError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_registry_apply_failure_leaves_encoders_unchanged() {
        let mut reg = registry();
        let before = reg.clone();
        let data = DataFrame::from_columns(vec![
            Column::categorical("class", ["z"]),
            Column::categorical("color", ["green"]),
        ])
        .unwrap();
        assert!(matches!(
            reg.apply(&data),
            Err(PreprocessingError::UnknownCategory { .. })
        ));
        assert_eq!(reg.ordinal("class").unwrap().len(), 2);
        assert_eq!(reg, before);
    }

    #[test]
    fn test_registry_take_ordinal_rejects_one_hot() {
        let mut reg = registry();
        assert!(reg.take_ordinal("color").is_err());
        assert!(reg.contains("color"));
        assert!(reg.take_ordinal("class").unwrap().is_some());
        assert!(!reg.contains("class"));
        assert!(reg.take_ordinal("missing").unwrap().is_none());
    }

    #[test]
    fn test_registry_merge() {
        let mut a = EncoderRegistry::new();
        a.insert("x", Encoder::Ordinal(OrdinalEncoder::new()));
        let mut b = EncoderRegistry::new();
        b.insert("y", Encoder::Ordinal(OrdinalEncoder::new()));
        a.merge(b);
        assert_eq!(a.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(), vec!["x", "y"]);
    }
}
