//! # tabprep
//!
//! Reproducible preprocessing for tabular data ahead of an automated
//! pipeline-tuning run: synthetic missing values, categorical encoding that
//! tolerates unseen categories, and multivariate iterative imputation fit on
//! one partition and applied to another.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tabprep::dataset::csv::read_csv_path;
//! use tabprep::preprocessing::{encode_selected, impute, simulate_missing_data, ColumnSelection};
//!
//! let data = read_csv_path("mushroom.csv")?;
//! let flags: Vec<bool> = data.categorical_columns().iter().map(|c| c == "class").collect();
//! let (encoded, encoders) = encode_selected(&data, &ColumnSelection::Categorical, &flags)?;
//!
//! let (train, test) = encoded.split(0.8)?;
//! let train = simulate_missing_data(&train, 0.3)?;
//! let test = simulate_missing_data(&test, 0.3)?;
//! let (train, test) = impute(&train, &test, 10, 1e-3)?;
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: `DataFrame` with a typed schema, plus CSV ingestion
//! - `preprocessing`: missing-data simulation, encoding, imputation
//! - `model`: the `Regressor` seam and `RidgeRegressor`
//! - `pipeline`: named steps over a working set, for a tuning driver
//! - `config`: serde parameter sets for every tunable knob

/// Tabular data model and ingestion.
pub mod dataset;

/// Data preprocessing transformers.
pub mod preprocessing;

/// Regression estimators used by iterative imputation.
pub mod model;

/// Named-step glue for pipeline drivers.
pub mod pipeline;

/// Serializable configuration.
pub mod config;

pub use config::PreprocessingConfig;
pub use dataset::{Cell, Column, ColumnType, DataFrame};
pub use preprocessing::error::{PreprocessingError, Result};
