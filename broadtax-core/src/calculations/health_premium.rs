//! Health insurance premium (including long-term care) by membership type.
//!
//! | Membership | Premium |
//! |------------|---------|
//! | Employee | `salary × r + max(0, non_salary − 2000) × r` |
//! | Dependent | 0 while `salary + non_salary ≤ 2000`, else `(salary + non_salary) × r` |
//! | Self-employed | `max(salary + non_salary, 0) × r` |
//!
//! `r` is the combined premium rate (8.0082% for 2025). Every premium is
//! zero when total income is zero or negative.
//!
//! A dependent whose income crosses the cutoff is reclassified and pays on
//! the whole total, so the premium jumps at the cutoff.

use rust_decimal::Decimal;
use tracing::trace;

use crate::calculations::common::{amount_or_rate, max};
use crate::calculations::decomposition::{isolate, marginal_rate};
use crate::{CalculationError, MembershipType, TaxOutput, TaxYearConfig};

/// Calculator for income-based health insurance premiums.
#[derive(Debug, Clone, Copy)]
pub struct HealthPremiumCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> HealthPremiumCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Premium on `ex_salary` (non-salary income) and `salary`. A rate is
    /// measured against their sum.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use broadtax_core::{HealthPremiumCalculator, MembershipType, TaxOutput, TaxYearConfig};
    ///
    /// let config = TaxYearConfig::year_2025();
    /// let calculator = HealthPremiumCalculator::new(&config);
    ///
    /// let at_cutoff = calculator.income_health_premium(
    ///     MembershipType::Dependent, dec!(2000), dec!(0), TaxOutput::Amount);
    /// let over_cutoff = calculator.income_health_premium(
    ///     MembershipType::Dependent, dec!(2001), dec!(0), TaxOutput::Amount);
    ///
    /// assert_eq!(at_cutoff, dec!(0));
    /// assert_eq!(over_cutoff, dec!(160.244082));
    /// ```
    pub fn income_health_premium(
        &self,
        member_type: MembershipType,
        ex_salary: Decimal,
        salary: Decimal,
        output: TaxOutput,
    ) -> Decimal {
        let total_income = ex_salary + salary;
        let rate = self.config.premium_rate();

        if total_income <= Decimal::ZERO {
            trace!(total_income = %total_income, "non-positive total income; no premium");
        }

        let premium = match member_type {
            MembershipType::Employee => {
                salary * rate + self.employee_ex_salary_premium(ex_salary, rate)
            }
            MembershipType::Dependent => {
                if total_income <= self.config.dependent_income_cutoff {
                    Decimal::ZERO
                } else {
                    trace!(
                        total_income = %total_income,
                        cutoff = %self.config.dependent_income_cutoff,
                        "dependent income above cutoff; premium on full income"
                    );
                    total_income * rate
                }
            }
            MembershipType::SelfEmployed => max(total_income, Decimal::ZERO) * rate,
        };

        amount_or_rate(premium, total_income, output)
    }

    /// Same as [`income_health_premium`](Self::income_health_premium) for a
    /// raw membership tag.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidCategory`] for an unknown tag.
    pub fn income_health_premium_for_tag(
        &self,
        member_type: &str,
        ex_salary: Decimal,
        salary: Decimal,
        output: TaxOutput,
    ) -> Result<Decimal, CalculationError> {
        let member_type = MembershipType::parse(member_type)?;

        Ok(self.income_health_premium(member_type, ex_salary, salary, output))
    }

    /// Share of the premium attributable to non-salary income. A rate is
    /// measured against `ex_salary`.
    pub fn h_premium_for_ex_salary(
        &self,
        member_type: MembershipType,
        ex_salary: Decimal,
        salary: Decimal,
        output: TaxOutput,
    ) -> Decimal {
        let premium = self.ex_salary_share(member_type, ex_salary, salary);

        amount_or_rate(premium, ex_salary, output)
    }

    /// Marginal premium rate on one more unit of non-salary income.
    pub fn h_premium_for_ex_salary_marginal_rate(
        &self,
        member_type: MembershipType,
        ex_salary: Decimal,
        salary: Decimal,
    ) -> Decimal {
        marginal_rate(
            |x| self.ex_salary_share(member_type, x, salary),
            ex_salary,
        )
    }

    fn employee_ex_salary_premium(
        &self,
        ex_salary: Decimal,
        rate: Decimal,
    ) -> Decimal {
        let cutoff = self.config.employee_ex_salary_cutoff;
        if ex_salary <= cutoff {
            return Decimal::ZERO;
        }

        (ex_salary - cutoff) * rate
    }

    fn ex_salary_share(
        &self,
        member_type: MembershipType,
        ex_salary: Decimal,
        salary: Decimal,
    ) -> Decimal {
        isolate(
            |x| self.income_health_premium(member_type, x, salary, TaxOutput::Amount),
            ex_salary,
        )
    }
}
