use thiserror::Error;

/// Errors raised by a single calculation call.
///
/// Non-positive monetary inputs are not errors; they yield zero liability.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// A membership type tag that is not one of `employee`, `dependent`
    /// or `self_employed`.
    #[error("unrecognized membership type '{0}' (expected employee, dependent or self_employed)")]
    InvalidCategory(String),

    /// Two array arguments have different lengths and neither is a scalar.
    #[error("array length mismatch: expected {expected} elements, found {found}")]
    ShapeMismatch { expected: usize, found: usize },
}
