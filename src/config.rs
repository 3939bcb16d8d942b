//! Serializable parameter sets for every tunable knob.
//!
//! Each component owns its own config struct with `Default` values and a
//! `validate` method; [`PreprocessingConfig`] aggregates them so a whole run
//! can be described in one JSON document. Missing fields take defaults.
//!
//! ```ignore
//! let config = PreprocessingConfig::from_json_str(r#"{
//!     "simulator": { "chance": 0.3 },
//!     "imputer": { "max_iter": 2, "tol": 0.5 },
//!     "encoding": { "strategies": ["ordinal", "one_hot"] }
//! }"#)?;
//! ```

use crate::model::RidgeConfig;
use crate::preprocessing::encoding::EncodingStrategy;
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::imputation::IterativeImputerConfig;
use crate::preprocessing::missing::SimulatorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which columns to encode and how.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// Columns to encode; `None` selects every categorical column.
    pub columns: Option<Vec<String>>,
    /// One strategy per selected column.
    pub strategies: Vec<EncodingStrategy>,
}

impl EncodingConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(columns) = &self.columns {
            if columns.len() != self.strategies.len() {
                return Err(PreprocessingError::LengthMismatch {
                    what: "strategies".to_string(),
                    expected: columns.len(),
                    got: self.strategies.len(),
                });
            }
        }
        Ok(())
    }
}

/// Parameters of a full preprocessing run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    pub simulator: SimulatorConfig,
    pub imputer: IterativeImputerConfig,
    pub ridge: RidgeConfig,
    pub encoding: EncodingConfig,
    /// Fraction of rows in the training partition.
    pub train_ratio: f64,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            simulator: SimulatorConfig::default(),
            imputer: IterativeImputerConfig::default(),
            ridge: RidgeConfig::default(),
            encoding: EncodingConfig::default(),
            train_ratio: 0.8,
        }
    }
}

impl PreprocessingConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loading preprocessing config");
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.simulator.validate()?;
        self.imputer.validate()?;
        self.ridge.validate()?;
        self.encoding.validate()?;
        if !(0.0..=1.0).contains(&self.train_ratio) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "train_ratio must be in [0, 1], got {}",
                self.train_ratio
            )));
        }
        Ok(())
    }
}
