//! Sorting and searching engine.
//!
//! The engine works over any slice of [`Keyed`] items: the merge sort
//! variants order by a numeric attribute and the linear search matches
//! a text attribute. Neither variant mutates its input; each returns a
//! freshly ordered `Vec`.

pub mod search;
pub mod sort;

use thiserror::Error;

use crate::models::{FieldValue, Record};

pub use search::{linear_search, SearchHit};
pub use sort::{is_sorted_by, merge_sort_iterative, merge_sort_recursive, sort_with};

/// Failures raised while reading keys during a sort or search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("record has no attribute '{attribute}'")]
    MissingAttribute { attribute: String },

    #[error("attribute '{attribute}' is not numeric")]
    NotNumeric { attribute: String },

    #[error("attribute '{attribute}' is not text")]
    NotText { attribute: String },
}

/// Access to the attributes the engine sorts and searches on.
pub trait Keyed {
    /// Numeric value of `attribute`, used as the sort key.
    fn numeric_key(&self, attribute: &str) -> Result<f64, EngineError>;

    /// Text value of `attribute`, used as the search key.
    fn text_key(&self, attribute: &str) -> Result<&str, EngineError>;
}

impl Keyed for Record {
    fn numeric_key(&self, attribute: &str) -> Result<f64, EngineError> {
        match self.get(attribute) {
            Some(FieldValue::Number(n)) => Ok(*n),
            Some(FieldValue::Text(_)) => Err(EngineError::NotNumeric {
                attribute: attribute.to_string(),
            }),
            None => Err(EngineError::MissingAttribute {
                attribute: attribute.to_string(),
            }),
        }
    }

    fn text_key(&self, attribute: &str) -> Result<&str, EngineError> {
        match self.get(attribute) {
            Some(FieldValue::Text(s)) => Ok(s),
            Some(FieldValue::Number(_)) => Err(EngineError::NotText {
                attribute: attribute.to_string(),
            }),
            None => Err(EngineError::MissingAttribute {
                attribute: attribute.to_string(),
            }),
        }
    }
}
