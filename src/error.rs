//! Input validation errors

use thiserror::Error;

/// A profile could not be turned into scoring input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// A numeric field held a value that cannot be read as a number
    #[error("field '{field}' must be numeric, got {value}")]
    NotNumeric { field: &'static str, value: String },

    /// A numeric field parsed to NaN or infinity
    #[error("field '{field}' must be a finite number")]
    NotFinite { field: &'static str },

    /// The profile document is not a JSON object
    #[error("profile must be a JSON object")]
    NotAnObject,
}
