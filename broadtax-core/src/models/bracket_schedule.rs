//! Progressive schedule stored as data and evaluated by one generic rule.
//!
//! The 2025 schedule, on unit-10k tax bases, with every row multiplied by
//! the 1.1 surtax factor:
//!
//! | Upper bound | Base tax | Rate on excess |
//! |-------------|----------|----------------|
//! | 1,400       | 0        | 6%             |
//! | 5,000       | 84       | 15%            |
//! | 8,800       | 624      | 24%            |
//! | 15,000      | 1,536    | 35%            |
//! | 30,000      | 3,706    | 38%            |
//! | 50,000      | 9,406    | 40%            |
//! | 100,000     | 17,406   | 42%            |
//! | unbounded   | 38,406   | 45%            |
//!
//! Non-positive bases owe nothing.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TaxBracket;

/// Errors found while validating a schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("schedule has no brackets")]
    Empty,

    #[error("first bracket must start at 0, got {0}")]
    FirstBracketNotAtZero(Decimal),

    #[error("bracket {index} must start at {expected}, got {found}")]
    Gap {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} has an upper bound not above its lower bound")]
    EmptyRange { index: usize },

    #[error("bracket {index} is unbounded but is not the last bracket")]
    Unbounded { index: usize },

    #[error("last bracket must be unbounded, got upper bound {0}")]
    LastBracketBounded(Decimal),

    #[error("bracket {index} base tax must be {expected} to continue the previous row, got {found}")]
    Discontinuous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("tax rate must be between 0 and 1, got {0}")]
    InvalidRate(Decimal),

    #[error("surtax multiplier must be positive, got {0}")]
    InvalidMultiplier(Decimal),

    #[error("bracket {index} surtax multiplier must be {expected} like the first row, got {found}")]
    MixedMultiplier {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },
}

/// An ordered, contiguous progressive schedule from 0 to infinity.
///
/// Construction validates the rows, so evaluation never fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketSchedule {
    brackets: Vec<TaxBracket>,
}

impl BracketSchedule {
    /// Validates `brackets` and builds a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] if the rows are empty, do not start at 0,
    /// leave a gap, are not closed by exactly one unbounded row, jump in
    /// accumulated base tax, carry an out-of-range rate or multiplier, or
    /// mix surtax multipliers.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, ScheduleError> {
        validate(&brackets)?;
        Ok(Self { brackets })
    }

    /// The 2025 comprehensive income tax schedule.
    pub fn year_2025() -> Self {
        // National tax plus the 10% local income tax.
        let surtax = Decimal::new(11, 1);
        let rows: [(i64, Option<i64>, i64, i64); 8] = [
            (0, Some(1_400), 6, 0),
            (1_400, Some(5_000), 15, 84),
            (5_000, Some(8_800), 24, 624),
            (8_800, Some(15_000), 35, 1_536),
            (15_000, Some(30_000), 38, 3_706),
            (30_000, Some(50_000), 40, 9_406),
            (50_000, Some(100_000), 42, 17_406),
            (100_000, None, 45, 38_406),
        ];

        let brackets = rows
            .into_iter()
            .map(|(min, max, rate_percent, base)| TaxBracket {
                min_income: Decimal::from(min),
                max_income: max.map(Decimal::from),
                tax_rate: Decimal::new(rate_percent, 2),
                base_tax: Decimal::from(base),
                surtax_multiplier: surtax,
            })
            .collect();

        Self { brackets }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Upper bounds of every bounded row, in ascending order.
    pub fn boundaries(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.brackets.iter().filter_map(|b| b.max_income)
    }

    /// Tax owed on `tax_base`.
    ///
    /// Total over all inputs and non-decreasing in `tax_base`. A base
    /// exactly on a boundary uses the lower row.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use broadtax_core::BracketSchedule;
    ///
    /// let schedule = BracketSchedule::year_2025();
    ///
    /// assert_eq!(schedule.tax_for(dec!(1400)), dec!(92.4));
    /// assert_eq!(schedule.tax_for(dec!(-10)), dec!(0));
    /// ```
    pub fn tax_for(
        &self,
        tax_base: Decimal,
    ) -> Decimal {
        if tax_base <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        self.brackets
            .iter()
            .find(|b| b.contains(tax_base))
            .or_else(|| self.brackets.last())
            .map_or(Decimal::ZERO, |b| b.tax_for(tax_base))
    }

    /// Convenience for callers holding `f64` bases (e.g. plotting grids).
    pub fn tax_for_f64(
        &self,
        tax_base: f64,
    ) -> Option<Decimal> {
        Decimal::from_f64(tax_base).map(|base| self.tax_for(base))
    }
}

impl Default for BracketSchedule {
    fn default() -> Self {
        Self::year_2025()
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketSchedule {
    type Error = ScheduleError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketSchedule> for Vec<TaxBracket> {
    fn from(schedule: BracketSchedule) -> Self {
        schedule.brackets
    }
}

fn validate(brackets: &[TaxBracket]) -> Result<(), ScheduleError> {
    let first = brackets.first().ok_or(ScheduleError::Empty)?;
    if first.min_income != Decimal::ZERO {
        return Err(ScheduleError::FirstBracketNotAtZero(first.min_income));
    }

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
            return Err(ScheduleError::InvalidRate(bracket.tax_rate));
        }
        if bracket.surtax_multiplier <= Decimal::ZERO {
            return Err(ScheduleError::InvalidMultiplier(
                bracket.surtax_multiplier,
            ));
        }
        // Base tax continuity is checked before surtax, so it only keeps the
        // schedule continuous when every row shares one multiplier.
        if bracket.surtax_multiplier != first.surtax_multiplier {
            return Err(ScheduleError::MixedMultiplier {
                index,
                expected: first.surtax_multiplier,
                found: bracket.surtax_multiplier,
            });
        }
    }

    let last_index = brackets.len() - 1;
    for (index, pair) in brackets.windows(2).enumerate() {
        let (current, next) = (&pair[0], &pair[1]);

        let Some(max) = current.max_income else {
            return Err(ScheduleError::Unbounded { index });
        };
        if max <= current.min_income {
            return Err(ScheduleError::EmptyRange { index });
        }
        if next.min_income != max {
            return Err(ScheduleError::Gap {
                index: index + 1,
                expected: max,
                found: next.min_income,
            });
        }
        let expected_base = current.base_tax + (max - current.min_income) * current.tax_rate;
        if next.base_tax != expected_base {
            return Err(ScheduleError::Discontinuous {
                index: index + 1,
                expected: expected_base,
                found: next.base_tax,
            });
        }
    }

    if let Some(max) = brackets[last_index].max_income {
        return Err(ScheduleError::LastBracketBounded(max));
    }

    Ok(())
}
