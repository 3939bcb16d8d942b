//! Named values passed between steps.

use crate::dataset::DataFrame;
use crate::preprocessing::encoding::EncoderRegistry;
use crate::preprocessing::error::{PreprocessingError, Result};
use std::collections::BTreeMap;

/// A value a step can read or produce.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Frame(DataFrame),
    Encoders(EncoderRegistry),
    Scalar(f64),
}

impl Value {
    /// Get the kind name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Frame(_) => "frame",
            Value::Encoders(_) => "encoders",
            Value::Scalar(_) => "scalar",
        }
    }
}

impl From<DataFrame> for Value {
    fn from(frame: DataFrame) -> Self {
        Value::Frame(frame)
    }
}

impl From<EncoderRegistry> for Value {
    fn from(encoders: EncoderRegistry) -> Self {
        Value::Encoders(encoders)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

fn wrong_kind(name: &str, expected: &str) -> PreprocessingError {
    PreprocessingError::TypeMismatch {
        column: name.to_string(),
        expected: expected.to_string(),
    }
}

/// The named inputs and outputs of a run.
///
/// Steps read their inputs by name and write their outputs back under the
/// names they declare, so an external driver can wire steps together
/// without knowing their types.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkingSet {
    values: BTreeMap<String, Value>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a value, returning the one previously stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// # Errors
    /// [`PreprocessingError::MissingInput`] if nothing is stored under `name`.
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| PreprocessingError::MissingInput(name.to_string()))
    }

    /// Remove and return a value.
    pub fn take(&mut self, name: &str) -> Result<Value> {
        self.values
            .remove(name)
            .ok_or_else(|| PreprocessingError::MissingInput(name.to_string()))
    }

    pub fn frame(&self, name: &str) -> Result<&DataFrame> {
        match self.get(name)? {
            Value::Frame(frame) => Ok(frame),
            _ => Err(wrong_kind(name, "frame")),
        }
    }

    pub fn encoders(&self, name: &str) -> Result<&EncoderRegistry> {
        match self.get(name)? {
            Value::Encoders(encoders) => Ok(encoders),
            _ => Err(wrong_kind(name, "encoders")),
        }
    }

    pub fn scalar(&self, name: &str) -> Result<f64> {
        match self.get(name)? {
            Value::Scalar(v) => Ok(*v),
            _ => Err(wrong_kind(name, "scalar")),
        }
    }

    /// Remove and return a frame; a value of another kind is left in place.
    pub fn take_frame(&mut self, name: &str) -> Result<DataFrame> {
        match self.take(name)? {
            Value::Frame(frame) => Ok(frame),
            other => {
                self.values.insert(name.to_string(), other);
                Err(wrong_kind(name, "frame"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    fn frame() -> DataFrame {
        DataFrame::from_columns(vec![Column::numeric("x", [1.0, 2.0])]).unwrap()
    }

    #[test]
    fn test_working_set_typed_access() {
        let ws = WorkingSet::new()
            .with("data", frame())
            .with("score", 0.5)
            .with("encoders", EncoderRegistry::new());

        assert_eq!(ws.len(), 3);
        assert_eq!(ws.frame("data").unwrap(), &frame());
        assert_eq!(ws.scalar("score").unwrap(), 0.5);
        assert!(ws.encoders("encoders").unwrap().is_empty());
        assert_eq!(ws.names().collect::<Vec<_>>(), vec!["data", "encoders", "score"]);
    }

    #[test]
    fn test_working_set_missing_and_wrong_kind() {
        let mut ws = WorkingSet::new().with("score", 1.0);
        assert!(matches!(
            ws.frame("data"),
            Err(PreprocessingError::MissingInput(_))
        ));
        assert!(matches!(
            ws.frame("score"),
            Err(PreprocessingError::TypeMismatch { .. })
        ));
        assert!(ws.take_frame("score").is_err());
        assert!(ws.contains("score"));
        assert_eq!(ws.get("score").unwrap().kind(), "scalar");
    }

    #[test]
    fn test_working_set_take() {
        let mut ws = WorkingSet::new().with("data", frame());
        let taken = ws.take_frame("data").unwrap();
        assert_eq!(taken, frame());
        assert!(ws.is_empty());
    }
}
