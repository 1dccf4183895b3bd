use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::BracketSchedule;

/// Errors found while validating a [`TaxYearConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A rate outside `[0, 1]`.
    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidRate { name: &'static str, value: Decimal },

    /// A cutoff, deduction or year count below zero.
    #[error("{name} must be non-negative, got {value}")]
    NegativeAmount { name: &'static str, value: Decimal },
}

/// Statutory constants for one tax year.
///
/// Every amount is in unit-10k. Fields missing from a deserialized config
/// take their 2025 value, so a config file only needs to list what changed.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use broadtax_core::TaxYearConfig;
///
/// let config = TaxYearConfig {
///     earned_income_deduction: dec!(300),
///     ..TaxYearConfig::year_2025()
/// };
///
/// assert_eq!(config.premium_rate(), dec!(0.080082));
/// assert_eq!(config.validate(), Ok(()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxYearConfig {
    pub tax_year: i32,

    /// Flat rate withheld on financial income (14% national + 1.4% local).
    pub withholding_rate: Decimal,

    /// Personal deduction subtracted before the progressive schedule.
    pub earned_income_deduction: Decimal,

    /// Financial income above this amount is folded into comprehensive taxation.
    pub financial_income_cutoff: Decimal,

    /// Health insurance premium rate.
    pub health_insurance_rate: Decimal,

    /// Long-term care premium, expressed as a rate on income.
    pub long_term_care_rate: Decimal,

    /// Employees pay an extra premium on non-salary income above this amount.
    pub employee_ex_salary_cutoff: Decimal,

    /// Dependents whose total income exceeds this amount lose their status.
    pub dependent_income_cutoff: Decimal,

    /// One-home sales up to this price are fully exempt from capital gains tax.
    pub luxury_house_cutoff: Decimal,

    /// Basic deduction from the capital gains tax base.
    pub capital_gain_deduction: Decimal,

    /// Long-term holding deduction earned per full year held or lived in.
    pub annual_deduction_rate: Decimal,
    pub max_holding_deduction: Decimal,
    pub max_residency_deduction: Decimal,

    /// Holding periods shorter than this earn no holding deduction.
    pub min_holding_years: Decimal,

    /// Residency periods shorter than this earn no residency deduction.
    pub min_residency_years: Decimal,

    pub brackets: BracketSchedule,
}

impl TaxYearConfig {
    pub fn year_2025() -> Self {
        Self {
            tax_year: 2025,
            withholding_rate: Decimal::new(154, 3),
            earned_income_deduction: Decimal::from(150),
            financial_income_cutoff: Decimal::from(2000),
            health_insurance_rate: Decimal::new(709, 4),
            long_term_care_rate: Decimal::new(9182, 6),
            employee_ex_salary_cutoff: Decimal::from(2000),
            dependent_income_cutoff: Decimal::from(2000),
            luxury_house_cutoff: Decimal::from(120_000),
            capital_gain_deduction: Decimal::from(250),
            annual_deduction_rate: Decimal::new(4, 2),
            max_holding_deduction: Decimal::new(40, 2),
            max_residency_deduction: Decimal::new(40, 2),
            min_holding_years: Decimal::from(3),
            min_residency_years: Decimal::from(2),
            brackets: BracketSchedule::year_2025(),
        }
    }

    /// Combined health and long-term care premium rate (8.0082% for 2025).
    pub fn premium_rate(&self) -> Decimal {
        self.health_insurance_rate + self.long_term_care_rate
    }

    /// Checks every rate lies in `[0, 1]` and every amount is non-negative.
    ///
    /// The bracket schedule is validated when it is built.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rates = [
            ("withholding_rate", self.withholding_rate),
            ("health_insurance_rate", self.health_insurance_rate),
            ("long_term_care_rate", self.long_term_care_rate),
            ("premium_rate", self.premium_rate()),
            ("annual_deduction_rate", self.annual_deduction_rate),
            ("max_holding_deduction", self.max_holding_deduction),
            ("max_residency_deduction", self.max_residency_deduction),
        ];
        for (name, value) in rates {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(ConfigError::InvalidRate { name, value });
            }
        }

        let amounts = [
            ("earned_income_deduction", self.earned_income_deduction),
            ("financial_income_cutoff", self.financial_income_cutoff),
            ("employee_ex_salary_cutoff", self.employee_ex_salary_cutoff),
            ("dependent_income_cutoff", self.dependent_income_cutoff),
            ("luxury_house_cutoff", self.luxury_house_cutoff),
            ("capital_gain_deduction", self.capital_gain_deduction),
            ("min_holding_years", self.min_holding_years),
            ("min_residency_years", self.min_residency_years),
        ];
        for (name, value) in amounts {
            if value < Decimal::ZERO {
                return Err(ConfigError::NegativeAmount { name, value });
            }
        }

        Ok(())
    }
}

impl Default for TaxYearConfig {
    fn default() -> Self {
        Self::year_2025()
    }
}
