//! Scalar-or-array arguments for element-wise evaluation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CalculationError;

/// A single value or an array of independent values.
///
/// Scalars broadcast against arrays. Deserializes from either a number
/// or a list of numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Series {
    Scalar(Decimal),
    Array(Vec<Decimal>),
}

impl Series {
    /// `count` evenly spaced values from `start` to `end` inclusive.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use broadtax_core::Series;
    ///
    /// let series = Series::linspace(dec!(0), dec!(10000), 5);
    ///
    /// assert_eq!(
    ///     series,
    ///     Series::Array(vec![dec!(0), dec!(2500), dec!(5000), dec!(7500), dec!(10000)])
    /// );
    /// ```
    pub fn linspace(
        start: Decimal,
        end: Decimal,
        count: usize,
    ) -> Self {
        if count < 2 {
            return Self::Array(vec![start; count]);
        }

        let step = (end - start) / Decimal::from(count - 1);
        let mut values: Vec<Decimal> = (0..count)
            .map(|i| start + step * Decimal::from(i))
            .collect();

        // Pin the last point; the step may not be exact.
        if let Some(last) = values.last_mut() {
            *last = end;
        }

        Self::Array(values)
    }

    /// Every `(x, y)` pair of two axes, as two flat arrays with `x` varying
    /// fastest.
    pub fn grid(
        x: &[Decimal],
        y: &[Decimal],
    ) -> (Self, Self) {
        let xs = y.iter().flat_map(|_| x.iter().copied()).collect();
        let ys = y
            .iter()
            .flat_map(|&value| std::iter::repeat_n(value, x.len()))
            .collect();

        (Self::Array(xs), Self::Array(ys))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Number of elements; a scalar counts as one.
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Array(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Array(values) if values.is_empty())
    }

    /// The values as a vector; a scalar yields one element.
    pub fn to_vec(&self) -> Vec<Decimal> {
        match self {
            Self::Scalar(value) => vec![*value],
            Self::Array(values) => values.clone(),
        }
    }

    /// The values stretched to `len` elements; a scalar is repeated.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::ShapeMismatch`] when an array does not
    /// have exactly `len` elements.
    pub fn broadcast_to(
        &self,
        len: usize,
    ) -> Result<Vec<Decimal>, CalculationError> {
        match self {
            Self::Scalar(value) => Ok(vec![*value; len]),
            Self::Array(values) if values.len() == len => Ok(values.clone()),
            Self::Array(values) => Err(CalculationError::ShapeMismatch {
                expected: len,
                found: values.len(),
            }),
        }
    }

    /// Applies `f` to every element.
    pub fn map<F>(
        &self,
        f: F,
    ) -> Self
    where
        F: Fn(Decimal) -> Decimal,
    {
        match self {
            Self::Scalar(value) => Self::Scalar(f(*value)),
            Self::Array(values) => Self::Array(values.iter().map(|&v| f(v)).collect()),
        }
    }

    /// Applies `f` element-wise across `inputs`, broadcasting scalars.
    ///
    /// `f` receives one value per input, in order. The result is a scalar
    /// only when every input is a scalar.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::ShapeMismatch`] when two arrays differ
    /// in length.
    pub fn zip_with<F>(
        inputs: &[&Series],
        f: F,
    ) -> Result<Self, CalculationError>
    where
        F: Fn(&[Decimal]) -> Decimal,
    {
        let mut args = Vec::with_capacity(inputs.len());

        let Some(len) = broadcast_len(inputs)? else {
            args.extend(inputs.iter().map(|series| series.value_at(0)));
            return Ok(Self::Scalar(f(&args)));
        };

        let values = (0..len)
            .map(|index| {
                args.clear();
                args.extend(inputs.iter().map(|series| series.value_at(index)));
                f(&args)
            })
            .collect();

        Ok(Self::Array(values))
    }

    /// Element at `index`. A scalar returns its value for any index; an
    /// array index must have been checked by `broadcast_len`.
    fn value_at(
        &self,
        index: usize,
    ) -> Decimal {
        match self {
            Self::Scalar(value) => *value,
            Self::Array(values) => values[index],
        }
    }
}

impl From<Decimal> for Series {
    fn from(value: Decimal) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<Decimal>> for Series {
    fn from(values: Vec<Decimal>) -> Self {
        Self::Array(values)
    }
}

impl From<&[Decimal]> for Series {
    fn from(values: &[Decimal]) -> Self {
        Self::Array(values.to_vec())
    }
}

/// Common array length of `inputs`, or `None` if all are scalars.
fn broadcast_len(inputs: &[&Series]) -> Result<Option<usize>, CalculationError> {
    let mut len = None;

    for series in inputs {
        let Series::Array(values) = series else {
            continue;
        };

        match len {
            None => len = Some(values.len()),
            Some(expected) if expected != values.len() => {
                return Err(CalculationError::ShapeMismatch {
                    expected,
                    found: values.len(),
                });
            }
            Some(_) => {}
        }
    }

    Ok(len)
}
