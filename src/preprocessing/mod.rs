//! Data preprocessing transformers for tabular data.
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer with hyperparameters
//! - [`FittedTransformer`]: Fitted transformer ready for inference
//!
//! # Available Transformers
//!
//! ## Missing data
//! - [`MissingDataSimulator`]: Seeded, per-cell synthetic missingness
//!
//! ## Encoding
//! - [`OrdinalEncoder`]: Integer codes with an extensible vocabulary
//! - [`OneHotEncoder`]: One indicator column per category
//! - [`encode_selected`]: Per-column choice between the two
//!
//! ## Imputation
//! - [`SimpleImputer`]: Fill missing values with mean, median, most_frequent, or constant
//! - [`IterativeImputer`]: Round-robin regression of each column on the others
//!
//! # Example
//!
//! ```ignore
//! use tabprep::preprocessing::{encode_selected, impute, simulate_missing_data, ColumnSelection};
//!
//! let (encoded, encoders) = encode_selected(&data, &ColumnSelection::Categorical, &flags)?;
//! let (train, test) = encoded.split(0.8)?;
//! let train = simulate_missing_data(&train, 0.2)?;
//! let test = simulate_missing_data(&test, 0.2)?;
//! let (train, test) = impute(&train, &test, 10, 1e-3)?;
//! ```

pub mod encoding;
pub mod error;
pub mod imputation;
pub mod missing;
pub mod traits;

// Re-export main types
pub use encoding::{
    encode_onehot, encode_ordinal, encode_selected, ColumnSelection, Encoder, EncoderRegistry,
    EncodingStrategy, FittedOneHotEncoder, OneHotEncoder, OrdinalEncoder,
};
pub use error::PreprocessingError;
pub use imputation::{
    impute, impute_pair, impute_with, FittedIterativeImputer, FittedSimpleImputer,
    ImputationOrder, ImputeStrategy, IterativeImputer, IterativeImputerConfig, SimpleImputer,
};
pub use missing::{simulate_missing_data, MissingDataSimulator, SimulatorConfig, DEFAULT_SEED};
pub use traits::{FittedTransformer, Transformer};
