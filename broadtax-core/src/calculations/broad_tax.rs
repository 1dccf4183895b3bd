//! Broad tax: income tax plus health insurance premium.
//!
//! Income is split three ways:
//!
//! - `fin_income`: financial income (interest, dividends)
//! - `salary`: earned income from employment
//! - `ex_fin_salary`: other income that is neither financial nor salary
//!
//! Income tax treats `salary + ex_fin_salary` as non-financial income. The
//! premium treats `fin_income + ex_fin_salary` as non-salary income.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calculations::common::amount_or_rate;
use crate::calculations::decomposition::{isolate, marginal_rate};
use crate::calculations::{HealthPremiumCalculator, IncomeTaxCalculator};
use crate::{MembershipType, TaxOutput, TaxYearConfig};

/// Breakdown of one broad tax calculation, all amounts in unit-10k.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadTaxResult {
    pub total_income: Decimal,
    pub income_tax: Decimal,
    pub health_premium: Decimal,

    /// `income_tax + health_premium`, or zero when total income is not positive.
    pub broad_tax: Decimal,
}

impl BroadTaxResult {
    /// Broad tax as a share of total income; zero when total income is not positive.
    pub fn effective_rate(&self) -> Decimal {
        amount_or_rate(self.broad_tax, self.total_income, TaxOutput::Rate)
    }
}

/// Combines [`IncomeTaxCalculator`] and [`HealthPremiumCalculator`].
#[derive(Debug, Clone, Copy)]
pub struct BroadTaxCalculator<'a> {
    income_tax: IncomeTaxCalculator<'a>,
    health_premium: HealthPremiumCalculator<'a>,
}

impl<'a> BroadTaxCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self {
            income_tax: IncomeTaxCalculator::new(config),
            health_premium: HealthPremiumCalculator::new(config),
        }
    }

    /// Income tax and premium on the three income components. A rate is
    /// measured against total income.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use broadtax_core::{BroadTaxCalculator, MembershipType, TaxOutput, TaxYearConfig};
    ///
    /// let config = TaxYearConfig::year_2025();
    /// let calculator = BroadTaxCalculator::new(&config);
    ///
    /// // Income tax 1218.8 + premium (3000 + 3000) * 0.080082
    /// let tax = calculator.broad_tax(
    ///     MembershipType::Employee, dec!(5000), dec!(3000), dec!(0), TaxOutput::Amount);
    ///
    /// assert_eq!(tax, dec!(1699.292));
    /// ```
    pub fn broad_tax(
        &self,
        member_type: MembershipType,
        fin_income: Decimal,
        salary: Decimal,
        ex_fin_salary: Decimal,
        output: TaxOutput,
    ) -> Decimal {
        let result = self.calculate(member_type, fin_income, salary, ex_fin_salary);

        amount_or_rate(result.broad_tax, result.total_income, output)
    }

    /// Share of [`broad_tax`](Self::broad_tax) attributable to financial
    /// income. A rate is measured against `fin_income`.
    pub fn broad_tax_for_fin(
        &self,
        member_type: MembershipType,
        fin_income: Decimal,
        salary: Decimal,
        ex_fin_salary: Decimal,
        output: TaxOutput,
    ) -> Decimal {
        let tax = self.fin_share(member_type, fin_income, salary, ex_fin_salary);

        amount_or_rate(tax, fin_income, output)
    }

    /// Marginal broad tax rate on one more unit of financial income.
    pub fn broad_tax_for_fin_marginal_rate(
        &self,
        member_type: MembershipType,
        fin_income: Decimal,
        salary: Decimal,
        ex_fin_salary: Decimal,
    ) -> Decimal {
        marginal_rate(
            |f| self.fin_share(member_type, f, salary, ex_fin_salary),
            fin_income,
        )
    }

    /// Runs the calculation and returns the breakdown.
    pub fn calculate(
        &self,
        member_type: MembershipType,
        fin_income: Decimal,
        salary: Decimal,
        ex_fin_salary: Decimal,
    ) -> BroadTaxResult {
        let total_income = fin_income + salary + ex_fin_salary;

        if total_income <= Decimal::ZERO {
            trace!(total_income = %total_income, "non-positive total income; no broad tax");
        }

        let income_tax = self.income_tax.final_income_tax(
            fin_income,
            salary + ex_fin_salary,
            TaxOutput::Amount,
        );
        let health_premium = self.health_premium.income_health_premium(
            member_type,
            fin_income + ex_fin_salary,
            salary,
            TaxOutput::Amount,
        );
        let broad_tax = amount_or_rate(income_tax + health_premium, total_income, TaxOutput::Amount);

        BroadTaxResult {
            total_income,
            income_tax,
            health_premium,
            broad_tax,
        }
    }

    fn fin_share(
        &self,
        member_type: MembershipType,
        fin_income: Decimal,
        salary: Decimal,
        ex_fin_salary: Decimal,
    ) -> Decimal {
        isolate(
            |f| self.broad_tax(member_type, f, salary, ex_fin_salary, TaxOutput::Amount),
            fin_income,
        )
    }
}
