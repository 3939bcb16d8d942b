//! Categorical feature encoding.
//!
//! Two strategies are available and can be chosen per column:
//!
//! ## Ordinal
//! Maps each category to an integer code in place. The vocabulary is
//! extensible: values unseen by an existing encoder are appended with new
//! codes instead of failing, and existing codes never change.
//!
//! ```ignore
//! // Input:  cap = ["x", "b", "x"]
//! // Output: cap = [1, 0, 1]
//! ```
//!
//! ## OneHot
//! Replaces a column with one `{column}_{category}` indicator column per
//! category seen at fit time. The category set is fixed: an unseen value at
//! transform time is an error.
//!
//! ```ignore
//! // Input:  color = ["red", "blue"]
//! // Output: color_blue = [0, 1], color_red = [1, 0]
//! ```
//!
//! The asymmetry between the two strategies on unseen values is deliberate
//! and covered by tests.

mod manager;
mod one_hot;
mod ordinal;
mod registry;

pub use manager::{encode_onehot, encode_ordinal, encode_selected, ColumnSelection};
pub use one_hot::{FittedOneHotEncoder, OneHotEncoder};
pub use ordinal::OrdinalEncoder;
pub use registry::{Encoder, EncoderRegistry};

use serde::{Deserialize, Serialize};

/// Encoding strategy for one categorical column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingStrategy {
    /// Integer codes through an extensible vocabulary.
    Ordinal,
    /// One indicator column per category.
    #[default]
    OneHot,
}

impl From<bool> for EncodingStrategy {
    /// `true` selects ordinal encoding, `false` one-hot.
    fn from(ordinal: bool) -> Self {
        if ordinal {
            EncodingStrategy::Ordinal
        } else {
            EncodingStrategy::OneHot
        }
    }
}
