//! Imputation transformers for handling missing values.
//!
//! # Available Transformers
//!
//! | Transformer | Description |
//! |-------------|-------------|
//! | [`SimpleImputer`] | Impute with mean, median, most_frequent, or constant |
//! | [`IterativeImputer`] | Model each column from the others, round-robin |
//!
//! # Example
//!
//! ```ignore
//! use tabprep::preprocessing::imputation::impute;
//!
//! // One imputer fit on train, applied to both partitions.
//! let (train, test) = impute(&train, &test, 10, 1e-3)?;
//! ```

pub mod iterative;
pub mod simple;

pub use iterative::{
    impute, impute_pair, impute_with, FittedIterativeImputer, ImputationOrder, ImputationStep,
    IterativeImputer, IterativeImputerConfig,
};
pub use simple::{FittedSimpleImputer, ImputeStrategy, SimpleImputer};
